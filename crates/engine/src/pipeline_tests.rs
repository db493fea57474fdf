// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vmscan_core::{AnalyzerFamily, FamilyParams, ScanConfig, TargetId, TargetScanResultId};
use vmscan_provider::fake::{FailurePoint, FakeProvider};
use vmscan_store::fake::FakeBackendStore;
use vmscan_store::BackendStore;

fn config(region: &str) -> ScanConfig {
    let mut cfg = ScanConfig::new(region, 4);
    cfg.families.enable(AnalyzerFamily::Sbom, FamilyParams::default());
    cfg
}

async fn seed_result(store: &FakeBackendStore, cfg: &ScanConfig) -> TargetScanResultId {
    let result_id = TargetScanResultId::new();
    let status = vmscan_core::TargetScanStatus::initial(cfg.families.enabled_families());
    let result = vmscan_core::TargetScanResult::new(
        result_id.clone(),
        vmscan_core::ScanId::new(),
        TargetId::new(),
        status,
    );
    store.post_scan_result(&result).await.unwrap();
    result_id
}

#[tokio::test]
async fn happy_path_attaches_volume_and_patches_status() {
    let provider = FakeProvider::new("us-east-1");
    let store = FakeBackendStore::new();
    let ctx = ScanContext::new();
    let cfg = config("us-east-1");
    let result_id = seed_result(&store, &cfg).await;
    let target = provider.seed_target_instance("us-east-1", "us-east-1a");
    let target_record =
        Target::new(TargetId::new(), "us-east-1", target.id().clone(), "us-east-1a");

    let job = run_job_pipeline(&ctx, &provider, &store, &cfg, &target_record, &result_id).await.unwrap();
    assert!(job.instance.is_some());
    assert!(job.volume.is_some());

    let status = store.get_scan_result_status(&result_id).await.unwrap();
    assert_eq!(status.general, vmscan_core::FamilyState::Attached);
}

#[tokio::test]
async fn cross_region_target_copies_snapshot_before_launch() {
    let provider = FakeProvider::new("eu-west-1");
    let store = FakeBackendStore::new();
    let ctx = ScanContext::new();
    let cfg = config("eu-west-1");
    let result_id = seed_result(&store, &cfg).await;
    let target = provider.seed_target_instance("us-east-1", "us-east-1a");
    let target_record =
        Target::new(TargetId::new(), "us-east-1", target.id().clone(), "us-east-1a");

    let job = run_job_pipeline(&ctx, &provider, &store, &cfg, &target_record, &result_id).await.unwrap();
    assert!(job.destination_snapshot.is_some());
    assert!(provider.calls().iter().any(|c| c.starts_with("copy_snapshot")));
}

#[tokio::test]
async fn failure_at_attach_reaps_the_partial_job() {
    let provider = FakeProvider::new("us-east-1");
    provider.inject_failure(FailurePoint::AttachVolume, vmscan_provider::ProviderError::Api("boom".into()));
    let store = FakeBackendStore::new();
    let ctx = ScanContext::new();
    let cfg = config("us-east-1");
    let result_id = seed_result(&store, &cfg).await;
    let target = provider.seed_target_instance("us-east-1", "us-east-1a");
    let target_record =
        Target::new(TargetId::new(), "us-east-1", target.id().clone(), "us-east-1a");

    let err = run_job_pipeline(&ctx, &provider, &store, &cfg, &target_record, &result_id).await.unwrap_err();
    assert!(matches!(err, PipelineError::Provider(_)));
    assert!(provider.calls().iter().any(|c| c.starts_with("delete_instance")));
    assert!(provider.calls().iter().any(|c| c.starts_with("delete_volume")));
}

#[tokio::test]
async fn cancelled_context_fails_before_any_cloud_call() {
    let provider = FakeProvider::new("us-east-1");
    let store = FakeBackendStore::new();
    let ctx = ScanContext::new();
    ctx.cancel();
    let cfg = config("us-east-1");
    let result_id = seed_result(&store, &cfg).await;
    let target = provider.seed_target_instance("us-east-1", "us-east-1a");
    let target_record =
        Target::new(TargetId::new(), "us-east-1", target.id().clone(), "us-east-1a");

    let err = run_job_pipeline(&ctx, &provider, &store, &cfg, &target_record, &result_id).await.unwrap_err();
    assert!(matches!(err, PipelineError::Cancelled));
    assert!(provider.calls().is_empty());
}
