use async_trait::async_trait;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use super::sink::ArtifactSink;
use crate::error::{Error, Result};

/// Writes artifacts below a root directory on the local filesystem.
///
/// Each artifact is written to a temporary file next to its final path and
/// renamed into place, so readers see either the old or the new content.
pub struct LocalSink {
    root: PathBuf,
}

impl LocalSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ArtifactSink for LocalSink {
    async fn put(&self, name: &str, body: Vec<u8>, _content_type: &str) -> Result<()> {
        let path = self.root.join(name);
        let bytes = body.len();

        let target = path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&target, &body))
            .await
            .map_err(|e| Error::write(name, e))?
            .map_err(|e| Error::write(name, e))?;

        debug!(path = %path.display(), bytes, "Artifact written");
        Ok(())
    }

    fn location(&self, name: &str) -> String {
        self.root.join(name).display().to_string()
    }
}

/// Blocking write of `body` to a temp file in the target directory, then
/// renamed over `path`.
fn write_atomic(path: &Path, body: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(body)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
