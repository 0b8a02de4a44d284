use std::time::SystemTime;

use power_usage_domain::domain::Snapshot;

use crate::{parser, sources::FetchError};

pub mod scheduler;

pub use scheduler::{Scheduler, SchedulerState, TickOutcome};

#[derive(Debug, Clone)]
pub struct Envelope<T> {
    pub payload: T,
    pub received_at: SystemTime,
}

impl<T> Envelope<T> {
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            received_at: SystemTime::now(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            payload: f(self.payload),
            received_at: self.received_at,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),
}

/// Whether a run replaced the published snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Published,
    /// No feed timestamp was found; the previous snapshot stays live.
    Retained,
}

#[async_trait::async_trait]
pub trait Source: Send + Sync {
    /// Retrieve the decoded feed text.
    async fn fetch(&self) -> Result<Envelope<String>, FetchError>;
}

pub trait Sink<T>: Send + Sync {
    fn publish(&self, input: Envelope<T>) -> PublishOutcome;
}

/// One fetch -> parse -> publish pass.
pub struct Pipeline<S, K> {
    pub source: S,
    pub sink: K,
}

impl<S, K> Pipeline<S, K>
where
    S: Source,
    K: Sink<Snapshot>,
{
    pub async fn run_once(&self) -> Result<PublishOutcome, PipelineError> {
        let fetched = self.source.fetch().await?;
        let candidate = fetched.map(|text| parser::parse(&text));
        Ok(self.sink.publish(candidate))
    }
}
