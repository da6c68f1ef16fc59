//! Periodic sweep trigger on a tokio runtime.
//!
//! The worker fires [`SweepJob::invoke`] on a fixed interval. A failed
//! invocation is logged and the worker waits for the next tick; it never
//! retries on its own.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::core::{JobOutcome, SweepJob, SweepOutcome};

/// Run `job` every `interval` until `shutdown` turns `true` or its sender is
/// dropped. The first trigger fires immediately.
///
/// Returns the number of triggers fired.
pub async fn start_sweep_worker(
    job: Arc<SweepJob>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> u64 {
    tracing::info!(interval_secs = interval.as_secs(), "starting sweep worker");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut triggers = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
                continue;
            }
        }
        if *shutdown.borrow() {
            break;
        }

        triggers += 1;
        match job.invoke().await {
            Ok(JobOutcome::Ran(report)) => match report.outcome {
                SweepOutcome::Exhausted { cursor } => tracing::info!(
                    run_id = %report.run_id,
                    units = report.units_produced,
                    %cursor,
                    "sweep run stopped on budget"
                ),
                SweepOutcome::Converged => tracing::info!(
                    run_id = %report.run_id,
                    units = report.units_produced,
                    "sweep run converged"
                ),
                SweepOutcome::Vetoed | SweepOutcome::NoBudget => tracing::debug!(
                    run_id = %report.run_id,
                    outcome = ?report.outcome,
                    "sweep run skipped"
                ),
            },
            Ok(JobOutcome::LockHeld) => {
                tracing::debug!("sweep trigger skipped, previous run still holds the lock");
            }
            Err(e) => {
                tracing::error!(error = %e, "sweep run failed");
            }
        }
    }

    tracing::info!(triggers, "sweep worker stopped");
    triggers
}
