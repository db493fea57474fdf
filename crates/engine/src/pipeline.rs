// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The nine-step job pipeline (SPEC_FULL.md §4.3): snapshot the target's
//! root volume, optionally copy it cross-region, launch a scanner instance,
//! attach a volume cut from the snapshot, and hand off to the result
//! waiter. Every fallible step records its resource on the `Job` before the
//! next one runs, and any error reaps the partial `Job` before returning.

use crate::family_config::render_family_config_yaml;
use crate::job::Job;
use crate::reaper::{self, CleanupGuard};
use crate::PipelineError;
use std::collections::BTreeMap;
use tracing::{info, instrument};
use vmscan_core::{ScanConfig, Target, TargetScanResultId, SNAPSHOT_COPY_TIMEOUT, SNAPSHOT_READY_TIMEOUT};
use vmscan_provider::{Instance, Provider, ScanContext, ScannerJobConfig, Snapshot, Volume};
use vmscan_store::BackendStore;

/// Runs the pipeline for one target. On success returns the provisioned
/// `Job` (still live — the caller hands it to the waiter and eventually the
/// reaper). On failure the partial job has already been reaped.
#[instrument(skip_all, fields(target_id = %target.id, scan_result_id = %result_id))]
pub async fn run_job_pipeline(
    ctx: &ScanContext,
    provider: &dyn Provider,
    store: &dyn BackendStore,
    config: &ScanConfig,
    target: &Target,
    result_id: &TargetScanResultId,
) -> Result<Job, PipelineError> {
    let mut guard = CleanupGuard::new();
    let mut job = Job::new();

    match run_steps(ctx, provider, store, config, target, result_id, &mut job).await {
        Ok(()) => {
            guard.disarm();
            Ok(job)
        }
        Err(err) => {
            info!(error = %err, "job pipeline failed, reaping partial job");
            reaper::reap(ctx, &job, false, false, config.delete_job_policy).await;
            guard.disarm();
            Err(err)
        }
    }
}

async fn run_steps(
    ctx: &ScanContext,
    provider: &dyn Provider,
    store: &dyn BackendStore,
    config: &ScanConfig,
    target: &Target,
    result_id: &TargetScanResultId,
    job: &mut Job,
) -> Result<(), PipelineError> {
    if ctx.is_cancelled() {
        return Err(PipelineError::Cancelled);
    }

    // 1. Obtain the target instance's root volume.
    let target_instance =
        provider.existing_instance(&target.instance, &target.region, &target.availability_zone);
    let root_volume = target_instance.get_root_volume(ctx).await?;

    // 2. Snapshot it, wait ready (T_snap).
    let source_snapshot = root_volume.take_snapshot(ctx).await?;
    source_snapshot.wait_for_ready(ctx, SNAPSHOT_READY_TIMEOUT).await?;
    let snapshot_region = source_snapshot.region().to_string();
    job.source_snapshot = Some(source_snapshot);

    // 3. Cross-region copy, conditional on region mismatch.
    let scan_region = if snapshot_region != config.region {
        let copy = job
            .source_snapshot
            .as_ref()
            .expect("source snapshot recorded above")
            .copy(ctx, &config.region)
            .await?;
        copy.wait_for_ready(ctx, SNAPSHOT_COPY_TIMEOUT).await?;
        job.destination_snapshot = Some(copy);
        config.region.clone()
    } else {
        snapshot_region
    };

    let scanning_snapshot = job
        .destination_snapshot
        .as_ref()
        .or(job.source_snapshot.as_ref())
        .expect("at least the source snapshot is always recorded");

    // 4. Render the family configuration document.
    let family_config_yaml = render_family_config_yaml(&config.families)
        .map_err(|e| PipelineError::Unexpected(format!("family config render failed: {e}")))?;

    // 5. Launch a scanner instance in the snapshot's region.
    let job_config = ScannerJobConfig {
        scanner_image: "vmscan-worker:latest".to_string(),
        instance_type: "m5.large".to_string(),
        key_pair_name: format!("vmscan-{}", result_id.suffix()),
        backend_address: String::new(),
        family_config_yaml,
        tags: BTreeMap::new(),
    };
    let worker_instance = provider
        .run_scanning_job(ctx, &config.region, scanning_snapshot.id(), &job_config)
        .await?;
    job.instance = Some(worker_instance);
    let worker_instance = job.instance.as_ref().expect("just recorded");

    // 6. Create a volume from the (possibly copied) snapshot.
    let volume = scanning_snapshot.create_volume(ctx, worker_instance.availability_zone()).await?;
    job.volume = Some(volume);
    let volume = job.volume.as_ref().expect("just recorded");

    // 7. Wait instance ready, wait volume ready.
    worker_instance.wait_for_ready(ctx).await?;

    // 8. Attach the volume, wait attached.
    worker_instance.attach_volume(ctx, volume.as_ref(), &config.device_name).await?;
    volume.wait_for_attached(ctx).await?;

    // 9. PATCH the target's general state to ATTACHED.
    let patch = vmscan_core::TargetScanStatusPatch {
        general: Some(vmscan_core::FamilyState::Attached),
        families: BTreeMap::new(),
    };
    store.patch_target_scan_status(result_id, &patch).await?;

    Ok(())
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
