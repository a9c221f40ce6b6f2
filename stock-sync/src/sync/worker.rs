//! SyncWorker - repeats sync rounds until shutdown
//!
//! Rounds never overlap: the interval is measured from the end of one round
//! to the start of the next, so a slow round pushes the following ones back.

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::round::{RoundOutcome, SyncEngine};
use crate::core::tasks::panic_message;

pub struct SyncWorker {
    engine: SyncEngine,
    interval: Duration,
    shutdown: CancellationToken,
}

impl SyncWorker {
    pub fn new(engine: SyncEngine, interval: Duration, shutdown: CancellationToken) -> Self {
        Self {
            engine,
            interval,
            shutdown,
        }
    }

    /// Run the sync loop
    ///
    /// 1. Run a round immediately
    /// 2. Sleep the interval
    /// 3. Repeat until the shutdown token is cancelled
    pub async fn run(self) {
        let options = self.engine.options();
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            fields = %options.policy,
            dry_run = options.dry_run,
            "SyncWorker started"
        );

        let mut round: u64 = 0;
        while !self.shutdown.is_cancelled() {
            round += 1;

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!(round, "Shutdown requested, abandoning current round");
                    break;
                }
                outcome = self.run_guarded(round) => {
                    if let Some(outcome) = outcome {
                        log_outcome(round, &outcome);
                    }
                }
            }

            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::info!(rounds = round, "SyncWorker stopped");
    }

    /// Run one round, containing any panic raised inside it
    ///
    /// Returns `None` when the round panicked.
    pub async fn run_guarded(&self, round: u64) -> Option<RoundOutcome> {
        let span = tracing::info_span!("sync_round", round);
        match AssertUnwindSafe(self.engine.run_round().instrument(span))
            .catch_unwind()
            .await
        {
            Ok(outcome) => Some(outcome),
            Err(panic_info) => {
                tracing::error!(
                    round,
                    panic = %panic_message(panic_info.as_ref()),
                    "Sync round panicked"
                );
                None
            }
        }
    }
}

fn log_outcome(round: u64, outcome: &RoundOutcome) {
    match outcome {
        RoundOutcome::Skipped {
            reason,
            source_products,
            target_products,
        } => {
            tracing::info!(
                round,
                %reason,
                source_products,
                target_products,
                "Sync round skipped"
            );
        }
        RoundOutcome::Completed(report) => {
            tracing::info!(
                round,
                duration_ms = report.duration_ms,
                matched = report.matched_pairs,
                pending = report.pending_updates,
                updated = report.products_updated,
                unchanged = report.products_unchanged,
                variants = report.variants_updated,
                failed = report.failures.len(),
                dry_run = report.dry_run,
                "Sync round completed"
            );
            for failure in &report.failures {
                tracing::warn!(
                    round,
                    product_id = %failure.product_id,
                    stage = %failure.stage,
                    error = %failure.error,
                    "Product left for the next round"
                );
            }
        }
    }
}
