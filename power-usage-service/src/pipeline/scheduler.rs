use std::{
    future::Future,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use power_usage_domain::domain::Snapshot;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::{Pipeline, PipelineError, PublishOutcome, Sink, Source};
use crate::config::MAX_SCHEDULE_SECS;

const MIN_PERIOD: Duration = Duration::from_secs(1);
const MAX_SCHEDULE: Duration = Duration::from_secs(MAX_SCHEDULE_SECS);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

#[derive(Debug)]
pub enum TickOutcome {
    Published,
    Retained,
    Failed(PipelineError),
    /// A previous run was still in flight.
    Skipped,
}

/// Drives the feed pipeline on a fixed period, never more than one run at a time.
pub struct Scheduler<S, K> {
    pipeline: Pipeline<S, K>,
    period: Duration,
    initial_delay: Duration,
    running: AtomicBool,
}

impl<S, K> Scheduler<S, K>
where
    S: Source,
    K: Sink<Snapshot>,
{
    pub fn new(pipeline: Pipeline<S, K>, period: Duration, initial_delay: Duration) -> Self {
        Self {
            pipeline,
            period: period.clamp(MIN_PERIOD, MAX_SCHEDULE),
            initial_delay: initial_delay.min(MAX_SCHEDULE),
            running: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.running.load(Ordering::Acquire) {
            SchedulerState::Running
        } else {
            SchedulerState::Idle
        }
    }

    /// Run the pipeline once unless a run is already in flight.
    ///
    /// Failures are logged and counted here; they never escape the scheduler.
    pub async fn tick(&self) -> TickOutcome {
        let Some(_running) = RunningGuard::acquire(&self.running) else {
            tracing::warn!("previous feed run still in progress, skipping tick");
            metrics::counter!("scheduler_ticks_skipped_total").increment(1);
            return TickOutcome::Skipped;
        };

        let started = std::time::Instant::now();
        let outcome = match self.pipeline.run_once().await {
            Ok(PublishOutcome::Published) => TickOutcome::Published,
            Ok(PublishOutcome::Retained) => TickOutcome::Retained,
            Err(e) => {
                tracing::error!(error = %e, "feed pipeline run failed, keeping previous snapshot");
                metrics::counter!("pipeline_failures_total").increment(1);
                TickOutcome::Failed(e)
            }
        };
        metrics::histogram!("pipeline_run_seconds").record(started.elapsed().as_secs_f64());

        outcome
    }

    /// Tick until `shutdown` resolves. The first tick fires after the initial delay.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let now = Instant::now();
        let start = now.checked_add(self.initial_delay).unwrap_or(now);
        let mut timer = interval_at(start, self.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        tracing::info!(
            period_secs = self.period.as_secs(),
            initial_delay_secs = self.initial_delay.as_secs(),
            "scheduler started"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("scheduler stopping");
                    break;
                }
                _ = timer.tick() => {
                    self.tick().await;
                }
            }
        }
    }
}

/// Holds the Running state; dropping it returns the scheduler to Idle.
struct RunningGuard<'a>(&'a AtomicBool);

impl<'a> RunningGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
