use std::path::PathBuf;

use super::{decode_feed, FetchError};
use crate::pipeline::{Envelope, Source};

/// Reads a saved copy of the feed (raw Shift_JIS bytes) from disk.
pub struct FeedFileSource {
    path: PathBuf,
}

impl FeedFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl Source for FeedFileSource {
    async fn fetch(&self) -> Result<Envelope<String>, FetchError> {
        let bytes = tokio::fs::read(&self.path).await?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "feed file loaded");
        Ok(Envelope::new(decode_feed(&bytes)))
    }
}
