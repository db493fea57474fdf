// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Polls a target's scan status until it reaches a terminal state, the
//! overall timeout elapses, or the kill signal fires (SPEC_FULL.md §4.4).

use std::time::Duration;
use tracing::{instrument, warn};
use vmscan_core::{FamilyState, TargetScanResultId};
use vmscan_provider::ScanContext;
use vmscan_store::BackendStore;

/// Outcome of waiting for a target's scan job to finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// A terminal state was observed; `success` reflects whether any
    /// sub-state reported an error.
    Finished { success: bool },
    /// The overall timeout elapsed before a terminal state was observed.
    TimedOut,
    /// The kill signal fired; the caller must not mutate completion state —
    /// the controller reconciles via its own terminal path.
    Cancelled,
}

/// Poll `result_id`'s status on `tick` until DONE/NOTSCANNED, `timeout`
/// elapses, or `ctx` is cancelled.
#[instrument(skip(ctx, store), fields(scan_result_id = %result_id))]
pub async fn wait_for_result(
    ctx: &ScanContext,
    store: &dyn BackendStore,
    result_id: &TargetScanResultId,
    tick: Duration,
    timeout: Duration,
) -> WaitOutcome {
    let deadline = tokio::time::Instant::now() + timeout;
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ctx.cancelled() => return WaitOutcome::Cancelled,
            _ = tokio::time::sleep_until(deadline) => return WaitOutcome::TimedOut,
            _ = interval.tick() => {}
        }

        let status = match store.get_scan_result_status(result_id).await {
            Ok(status) => status,
            Err(err) => {
                warn!(error = %err, "status poll failed, will retry next tick");
                continue;
            }
        };

        match status.general {
            FamilyState::Init | FamilyState::Attached | FamilyState::InProgress | FamilyState::Aborted => {
                continue;
            }
            FamilyState::Done | FamilyState::NotScanned => {
                return WaitOutcome::Finished { success: !status.has_any_errors() };
            }
        }
    }
}

#[cfg(test)]
#[path = "waiter_tests.rs"]
mod tests;
