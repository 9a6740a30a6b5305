//! Treasury Bot Sync Job
//!
//! Optional in-process schedule for the redemption orchestrator. The
//! HTTP trigger remains the primary invocation path; this job only runs
//! when an interval is configured, for deployments without an external
//! scheduler. The interval should be spaced further apart than one run's
//! expected duration - overlapping runs are only guarded by the PENDING
//! re-check at burn time.

use std::sync::Arc;
use tokio::time::{interval, Duration as TokioDuration};
use tracing::{error, info};

use crate::services::redemption::RedemptionProcessor;

/// Start the treasury bot job
///
/// Spawns a background task that runs one redemption batch per tick and
/// logs the per-batch outcome counts.
pub fn start_treasury_bot_job(processor: Arc<RedemptionProcessor>, interval_secs: u64) {
    tokio::spawn(async move {
        info!(interval_secs = interval_secs, "Treasury bot job started");

        let mut ticker = interval(TokioDuration::from_secs(interval_secs));

        loop {
            ticker.tick().await;

            match processor.run().await {
                Ok(report) => {
                    let failed = report
                        .results
                        .iter()
                        .filter(|r| r.status == "FAILED")
                        .count();
                    info!(
                        processed = report.processed,
                        completed = report.results.len() - failed,
                        failed = failed,
                        "Treasury bot batch complete"
                    );
                }
                Err(e) => {
                    // Batch-level failure; the next tick retries from scratch
                    error!(error = %e, "Treasury bot batch failed");
                }
            }
        }
    });
}
