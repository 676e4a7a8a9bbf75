//! Fixed-interval scheduler driving the analysis cycles

use crate::core::runtime::{panic_message, CycleReport, SignalRuntime};
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    Terminated,
}

/// Errors that end the scheduler loop.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("no markets to process")]
    EmptyPlan,
    #[error("analysis interval must be greater than zero")]
    ZeroInterval,
    #[error("cycle panicked: {0}")]
    Panicked(String),
}

/// Pause before the next cycle: whatever is left of `interval`, or nothing.
pub fn next_pause(interval: Duration, elapsed: Duration) -> Duration {
    interval.saturating_sub(elapsed)
}

/// Runs a cycle, sleeps for the rest of the interval, repeats.
pub struct JobScheduler {
    runtime: SignalRuntime,
    interval: Duration,
    state: SchedulerState,
}

impl JobScheduler {
    pub fn new(runtime: SignalRuntime, interval: Duration) -> Result<Self, SchedulerError> {
        if interval.is_zero() {
            return Err(SchedulerError::ZeroInterval);
        }

        info!(
            interval_secs = interval.as_secs(),
            markets = ?runtime.config().markets,
            "Scheduler: created with interval {}s",
            interval.as_secs()
        );

        Ok(Self {
            runtime,
            interval,
            state: SchedulerState::Running,
        })
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Run a single cycle.
    pub async fn tick(&mut self) -> Result<CycleReport, SchedulerError> {
        if self.runtime.config().markets.is_empty() {
            return Err(SchedulerError::EmptyPlan);
        }

        AssertUnwindSafe(self.runtime.run_cycle())
            .catch_unwind()
            .await
            .map_err(|payload| SchedulerError::Panicked(panic_message(payload.as_ref())))
    }

    /// Loop until an error escapes a cycle. The returned error is the reason
    /// the scheduler terminated.
    pub async fn run(&mut self) -> SchedulerError {
        info!("Scheduler: running");
        loop {
            let started = Instant::now();
            if let Err(e) = self.tick().await {
                self.state = SchedulerState::Terminated;
                error!(error = %e, "Scheduler: fatal error, terminating: {}", e);
                return e;
            }

            let pause = next_pause(self.interval, started.elapsed());
            info!(
                pause_secs = pause.as_secs(),
                "Scheduler: next cycle in {}s",
                pause.as_secs()
            );
            sleep(pause).await;
        }
    }
}
