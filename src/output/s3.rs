use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

use super::sink::ArtifactSink;
use crate::error::{Error, Result};

/// Uploads artifacts as objects in an S3 bucket, keyed by artifact name.
///
/// `PutObject` is atomic per key, so a failed upload never leaves a partial
/// object behind.
pub struct S3Sink {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Sink {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ArtifactSink for S3Sink {
    async fn put(&self, name: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(name)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| Error::write(name, DisplayErrorContext(e).to_string()))?;

        Ok(())
    }

    fn location(&self, name: &str) -> String {
        format!("s3://{}/{}", self.bucket, name)
    }
}

/// Downloads an object's full body.
#[tracing::instrument(skip(client))]
pub async fn get_object(client: &aws_sdk_s3::Client, bucket: &str, key: &str) -> anyhow::Result<Vec<u8>> {
    let resp = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("{}", DisplayErrorContext(e)))
        .with_context(|| format!("GetObject failed for s3://{bucket}/{key}"))?;

    let bytes = resp
        .body
        .collect()
        .await
        .with_context(|| format!("failed to read body of s3://{bucket}/{key}"))?;

    Ok(bytes.into_bytes().to_vec())
}
