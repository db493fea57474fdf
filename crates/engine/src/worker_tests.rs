// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::scan_data::ScanData;
use std::time::Duration;
use vmscan_core::{AnalyzerFamily, FamilyParams, ScanId, Target, TargetId, TargetScanResult, TargetScanStatus};
use vmscan_provider::fake::{FailurePoint, FakeProvider};
use vmscan_provider::Instance;
use vmscan_store::fake::FakeBackendStore;

fn config(region: &str) -> ScanConfig {
    let mut cfg = ScanConfig::new(region, 4);
    cfg.families.enable(AnalyzerFamily::Sbom, FamilyParams::default());
    cfg.job_results_polling_interval = Duration::from_millis(10);
    cfg.job_result_timeout = Duration::from_millis(200);
    cfg
}

async fn seed(store: &FakeBackendStore, cfg: &ScanConfig, target: &Target) -> ScanData {
    let result_id = TargetScanResultId::new();
    let status = TargetScanStatus::initial(cfg.families.enabled_families());
    let result =
        TargetScanResult::new(result_id.clone(), ScanId::new(), target.id.clone(), status);
    store.post_scan_result(&result).await.unwrap();
    ScanData { target: target.clone(), result_id }
}

#[tokio::test(start_paused = true)]
async fn happy_path_reports_success_once_scanner_finishes() {
    let provider = FakeProvider::new("us-east-1");
    let store = FakeBackendStore::new();
    let ctx = ScanContext::new();
    let cfg = config("us-east-1");
    let handle = provider.seed_target_instance("us-east-1", "us-east-1a");
    let target = Target::new(TargetId::new(), "us-east-1", handle.id().clone(), "us-east-1a");
    let data = seed(&store, &cfg, &target).await;
    let result_id = data.result_id.clone();

    let (_tx, rx) = mpsc::channel(1);
    let (completions_tx, mut completions_rx) = mpsc::channel(1);

    let store_for_flip = store.clone();
    let flipper = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        let patch = vmscan_core::TargetScanStatusPatch {
            general: Some(vmscan_core::FamilyState::Done),
            families: Default::default(),
        };
        store_for_flip.patch_target_scan_status(&result_id, &patch).await.unwrap();
    });

    let completion = process_one(&ctx, &provider, &store, &cfg, data).await.unwrap();
    flipper.await.unwrap();
    drop(rx);
    drop(completions_tx);
    assert!(completions_rx.recv().await.is_none());
    assert!(completion.success);
    assert!(!completion.timed_out);
}

#[tokio::test]
async fn pipeline_failure_reports_unsuccessful_completion() {
    let provider = FakeProvider::new("us-east-1");
    provider.inject_failure(FailurePoint::AttachVolume, vmscan_provider::ProviderError::Api("boom".into()));
    let store = FakeBackendStore::new();
    let ctx = ScanContext::new();
    let cfg = config("us-east-1");
    let handle = provider.seed_target_instance("us-east-1", "us-east-1a");
    let target = Target::new(TargetId::new(), "us-east-1", handle.id().clone(), "us-east-1a");
    let data = seed(&store, &cfg, &target).await;

    let completion = process_one(&ctx, &provider, &store, &cfg, data).await.unwrap();
    assert!(!completion.success);
    assert!(!completion.timed_out);
}

#[tokio::test(start_paused = true)]
async fn waiter_timeout_reports_timed_out_completion() {
    let provider = FakeProvider::new("us-east-1");
    let store = FakeBackendStore::new();
    let ctx = ScanContext::new();
    let cfg = config("us-east-1");
    let handle = provider.seed_target_instance("us-east-1", "us-east-1a");
    let target = Target::new(TargetId::new(), "us-east-1", handle.id().clone(), "us-east-1a");
    let data = seed(&store, &cfg, &target).await;

    let completion = process_one(&ctx, &provider, &store, &cfg, data).await.unwrap();
    assert!(!completion.success);
    assert!(completion.timed_out);
}

#[tokio::test]
async fn cancellation_before_pipeline_yields_no_completion() {
    let provider = FakeProvider::new("us-east-1");
    let store = FakeBackendStore::new();
    let ctx = ScanContext::new();
    ctx.cancel();
    let cfg = config("us-east-1");
    let handle = provider.seed_target_instance("us-east-1", "us-east-1a");
    let target = Target::new(TargetId::new(), "us-east-1", handle.id().clone(), "us-east-1a");
    let data = seed(&store, &cfg, &target).await;

    assert!(process_one(&ctx, &provider, &store, &cfg, data).await.is_none());
}

#[tokio::test]
async fn run_worker_exits_cleanly_once_queue_is_drained() {
    let provider = FakeProvider::new("us-east-1");
    let store = FakeBackendStore::new();
    let ctx = ScanContext::new();
    let cfg = config("us-east-1");
    let (tx, rx) = mpsc::channel(1);
    let (completions_tx, _completions_rx) = mpsc::channel(1);
    drop(tx);

    run_worker(ctx, &provider, &store, &cfg, rx, completions_tx).await;
}
