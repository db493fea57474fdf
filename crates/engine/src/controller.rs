// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The scan controller (SPEC_FULL.md §4.1): drives one scan from kickoff
//! to terminal state across a bounded pool of workers, folding every
//! completed target's summary into the scan and PATCHing progress as it
//! goes.

use crate::scan_data::{CompletionMessage, ScanData};
use crate::worker::run_worker_from_shared_queue;
use crate::ControllerError;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tracing::{instrument, warn};
use vmscan_core::{
    Scan, ScanConfig, ScanId, ScanPatch, ScanState, ScanStateReason, ScanSummary, Target,
    TargetScanResult, TargetScanResultId, TargetScanStatus,
};
use vmscan_provider::{Provider, ScanContext};
use vmscan_store::BackendStore;

/// Drives `scan_id` to completion against `targets`. Returns the scan's
/// final record as last observed from the store; a PATCH failure at the
/// very end is the one case this surfaces as [`ControllerError`] rather
/// than leaving it to per-target status.
#[instrument(skip_all, fields(scan_id = %scan_id, target_count = targets.len()))]
pub async fn run(
    ctx: ScanContext,
    provider: Arc<dyn Provider>,
    store: Arc<dyn BackendStore>,
    config: ScanConfig,
    scan_id: ScanId,
    targets: Vec<Target>,
) -> Result<Scan, ControllerError> {
    let total_targets = targets.len() as u64;
    let config = Arc::new(config);

    let mut scan_data = Vec::with_capacity(targets.len());
    for target in &targets {
        let status = TargetScanStatus::initial(config.families.enabled_families());
        let result =
            TargetScanResult::new(TargetScanResultId::new(), scan_id.clone(), target.id.clone(), status);
        let outcome = store.post_scan_result(&result).await?;
        scan_data.push(ScanData { target: target.clone(), result_id: outcome.id().clone() });
    }

    let queue_capacity = scan_data.len().max(1);
    let (queue_tx, queue_rx) = mpsc::channel::<ScanData>(queue_capacity);
    let (completion_tx, mut completion_rx) = mpsc::channel::<CompletionMessage>(queue_capacity);
    let queue_rx = Arc::new(AsyncMutex::new(queue_rx));

    let worker_count = config.max_parallel_scanners.max(1).min(queue_capacity);
    let mut worker_handles = Vec::with_capacity(worker_count);
    for _ in 0..worker_count {
        let worker_ctx = ctx.child();
        let provider = Arc::clone(&provider);
        let store = Arc::clone(&store);
        let config = Arc::clone(&config);
        let queue_rx = Arc::clone(&queue_rx);
        let completion_tx = completion_tx.clone();
        worker_handles.push(tokio::spawn(async move {
            run_worker_from_shared_queue(
                worker_ctx,
                provider.as_ref(),
                store.as_ref(),
                config.as_ref(),
                queue_rx,
                completion_tx,
            )
            .await;
        }));
    }
    drop(completion_tx);

    // Dispatch producer: stop enqueuing on the kill signal, but never close
    // the queue early — already-enqueued items still drain.
    for data in scan_data {
        if ctx.is_cancelled() {
            break;
        }
        if queue_tx.send(data).await.is_err() {
            break;
        }
    }
    drop(queue_tx);

    let mut jobs_completed: u64 = 0;
    let mut jobs_left_to_run: u64 = total_targets;
    let mut any_jobs_failed = false;
    let mut summary = ScanSummary::zeroed(total_targets);
    let mut cancelled_before_completion = false;

    while jobs_completed < total_targets {
        tokio::select! {
            biased;
            _ = ctx.cancelled() => {
                cancelled_before_completion = true;
                break;
            }
            message = completion_rx.recv() => {
                let Some(message) = message else {
                    // Every worker exited (e.g. all raced the kill signal)
                    // before reporting a completion for every target.
                    break;
                };
                jobs_completed += 1;
                jobs_left_to_run = jobs_left_to_run.saturating_sub(1);
                if !message.success {
                    any_jobs_failed = true;
                }

                match store.get_scan_result_summary(&message.result_id).await {
                    Ok(result_summary) => summary.add_findings(&result_summary),
                    Err(err) => warn!(error = %err, "failed to fetch target result summary"),
                }
                summary.jobs_completed = jobs_completed;
                summary.jobs_left_to_run = jobs_left_to_run;

                let patch = ScanPatch { summary: Some(summary.clone()), ..ScanPatch::default() };
                if let Err(err) = store.patch_scan(&scan_id, &patch).await {
                    warn!(error = %err, "failed to patch scan progress");
                }
            }
        }
    }

    if !cancelled_before_completion {
        for handle in worker_handles {
            let _ = handle.await;
        }
    }

    let (state, reason) = terminal_state(store.as_ref(), &scan_id, cancelled_before_completion, any_jobs_failed).await;

    let patch = ScanPatch {
        summary: Some(summary),
        state: Some(state),
        state_reason: Some(reason),
        state_message: None,
        end_time: Some(chrono::Utc::now()),
    };
    Ok(store.patch_scan(&scan_id, &patch).await?)
}

/// SPEC_FULL.md §4.1: a scan already marked ABORTED by an external actor
/// wins over everything else; a kill signal with no such marker means the
/// scan's own deadline elapsed; otherwise it's a function of whether any
/// job failed.
async fn terminal_state(
    store: &dyn BackendStore,
    scan_id: &ScanId,
    cancelled_before_completion: bool,
    any_jobs_failed: bool,
) -> (ScanState, ScanStateReason) {
    match store.get_scan(scan_id).await {
        Ok(scan) if scan.state_reason == Some(ScanStateReason::Aborted) => {
            (ScanState::Failed, ScanStateReason::Aborted)
        }
        Ok(_) if cancelled_before_completion => (ScanState::Failed, ScanStateReason::TimedOut),
        Ok(_) if any_jobs_failed => (ScanState::Failed, ScanStateReason::OneOrMoreTargetsFailed),
        Ok(_) => (ScanState::Done, ScanStateReason::Success),
        Err(err) => {
            warn!(error = %err, "could not read scan state for terminal computation");
            (ScanState::Failed, ScanStateReason::Unexpected)
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
