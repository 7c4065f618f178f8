//! AWS plumbing used by the CLI: SDK client setup and S3 event parsing.

pub mod s3_event;

/// Builds an S3 client from the ambient AWS configuration, overriding the
/// region when one is configured.
pub async fn s3_client(region: Option<&str>) -> aws_sdk_s3::Client {
    let mut loader = aws_config::from_env();
    if let Some(region) = region {
        loader = loader.region(aws_config::Region::new(region.to_string()));
    }
    let config = loader.load().await;
    aws_sdk_s3::Client::new(&config)
}
