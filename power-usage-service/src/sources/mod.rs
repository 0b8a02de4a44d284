pub mod feed_file;
pub mod http_feed;

pub use feed_file::FeedFileSource;
pub use http_feed::HttpFeedSource;

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("feed responded with HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to read feed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Decode feed bytes as Shift_JIS. Malformed sequences become U+FFFD.
pub fn decode_feed(bytes: &[u8]) -> String {
    let (text, had_errors) = encoding_rs::SHIFT_JIS.decode_without_bom_handling(bytes);
    if had_errors {
        tracing::warn!(bytes = bytes.len(), "feed contained malformed Shift_JIS sequences");
        metrics::counter!("feed_decode_replacements_total").increment(1);
    }
    text.into_owned()
}
