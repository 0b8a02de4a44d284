use std::time::SystemTime;

use reqwest::{Client, Proxy};

use super::{decode_feed, FetchError};
use crate::{
    config::FeedConfig,
    pipeline::{Envelope, PipelineError, Source},
};

/// Fetches the feed over HTTP, through the configured proxy if any.
///
/// Without a proxy the connection is direct; proxy variables in the process
/// environment are ignored.
#[derive(Clone)]
pub struct HttpFeedSource {
    url: String,
    client: Client,
}

impl HttpFeedSource {
    pub fn new(cfg: &FeedConfig) -> Result<Self, PipelineError> {
        let builder = Client::builder().timeout(cfg.timeout());
        let builder = match &cfg.proxy {
            Some(proxy) => {
                let proxy = Proxy::all(proxy.url())
                    .map_err(|e| PipelineError::Config(format!("invalid proxy '{}': {e}", proxy.url())))?;
                builder.proxy(proxy)
            }
            None => builder.no_proxy(),
        };
        let client = builder.build().map_err(FetchError::Client)?;

        Ok(Self {
            url: cfg.url.clone(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_text(&self) -> Result<Envelope<String>, FetchError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let received_at = SystemTime::now();
        let bytes = response.bytes().await?;
        tracing::debug!(url = %self.url, bytes = bytes.len(), "feed downloaded");

        Ok(Envelope {
            payload: decode_feed(&bytes),
            received_at,
        })
    }
}

#[async_trait::async_trait]
impl Source for HttpFeedSource {
    async fn fetch(&self) -> Result<Envelope<String>, FetchError> {
        metrics::counter!("feed_fetch_total").increment(1);

        let result = self.fetch_text().await;
        if let Err(e) = &result {
            tracing::warn!(url = %self.url, error = %e, "feed fetch failed");
            metrics::counter!("feed_fetch_errors_total").increment(1);
        }
        result
    }
}
