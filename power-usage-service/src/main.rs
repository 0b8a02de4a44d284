use anyhow::Result;
use power_usage_service::{
    config::AppConfig,
    observability,
    pipeline::{Pipeline, Scheduler},
    sinks::SnapshotPublisher,
    sources::HttpFeedSource,
    status_server,
};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    let publisher = SnapshotPublisher::new();

    // Start status server if configured
    if let Some(status_cfg) = &cfg.status {
        status_server::init(&status_cfg.bind_addr, publisher.subscribe())?;
    }

    let source = HttpFeedSource::new(&cfg.feed)?;
    tracing::info!(
        url = source.url(),
        proxy = ?cfg.feed.proxy.as_ref().map(|p| p.url()),
        timeout_secs = cfg.feed.timeout_secs,
        "power usage feed configured"
    );

    let scheduler = Scheduler::new(
        Pipeline {
            source,
            sink: publisher,
        },
        cfg.scheduler.period(),
        cfg.scheduler.initial_delay(),
    );

    scheduler
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await;

    Ok(())
}
