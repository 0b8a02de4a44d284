pub mod config;
pub mod observability;
pub mod parser;
pub mod pipeline;
pub mod sinks;
pub mod sources;
pub mod status_server;

pub use pipeline::{Envelope, Pipeline, Scheduler};
