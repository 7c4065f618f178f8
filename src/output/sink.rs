use async_trait::async_trait;

use crate::error::Result;

/// A destination that stores named artifacts.
///
/// `put` must be all-or-nothing: after a failure no partially written
/// artifact may be readable under `name`. Writing an existing name replaces
/// it.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    async fn put(&self, name: &str, body: Vec<u8>, content_type: &str) -> Result<()>;

    /// Human-readable location of `name`, for logs.
    fn location(&self, name: &str) -> String;
}
