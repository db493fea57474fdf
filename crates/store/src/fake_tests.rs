// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;
use vmscan_core::{AnalyzerFamily, FamilyToggles, Scan, ScanId, TargetId, TargetScanResult, TargetScanResultId, TargetScanStatus};

fn seeded_store() -> (FakeBackendStore, ScanId) {
    let store = FakeBackendStore::new();
    let scan_id = ScanId::new();
    store.seed_scan(Scan::new(scan_id.clone(), 2, Utc::now()));
    (store, scan_id)
}

fn enabled_status() -> TargetScanStatus {
    let toggles = FamilyToggles::new();
    TargetScanStatus::initial(toggles.enabled_families())
}

#[tokio::test]
async fn get_scan_returns_seeded_scan() {
    let (store, scan_id) = seeded_store();
    let scan = store.get_scan(&scan_id).await.unwrap();
    assert_eq!(scan.id, scan_id);
}

#[tokio::test]
async fn get_scan_missing_id_is_not_found() {
    let store = FakeBackendStore::new();
    let err = store.get_scan(&ScanId::new()).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn patch_scan_applies_only_supplied_fields() {
    let (store, scan_id) = seeded_store();
    let patch = ScanPatch { state: Some(vmscan_core::ScanState::InProgress), ..Default::default() };
    let scan = store.patch_scan(&scan_id, &patch).await.unwrap();
    assert_eq!(scan.state, vmscan_core::ScanState::InProgress);
    assert!(scan.state_message.is_none());
}

#[tokio::test]
async fn patch_scan_honors_injected_failure_then_recovers() {
    let (store, scan_id) = seeded_store();
    store.fail_next_patch_scan(1);
    let patch = ScanPatch::default();
    assert!(store.patch_scan(&scan_id, &patch).await.is_err());
    assert!(store.patch_scan(&scan_id, &patch).await.is_ok());
}

#[tokio::test]
async fn post_scan_result_is_idempotent_on_retry() {
    let (store, scan_id) = seeded_store();
    let target_id = TargetId::new();
    let result = TargetScanResult::new(
        TargetScanResultId::new(),
        scan_id.clone(),
        target_id.clone(),
        enabled_status(),
    );

    let first = store.post_scan_result(&result).await.unwrap();
    assert!(matches!(first, PostScanResultOutcome::Created(_)));

    let retry = TargetScanResult::new(
        TargetScanResultId::new(),
        scan_id,
        target_id,
        enabled_status(),
    );
    let second = store.post_scan_result(&retry).await.unwrap();
    assert_eq!(second, PostScanResultOutcome::AlreadyExists(first.id().clone()));
}

#[tokio::test]
async fn patch_target_scan_status_merges_per_family() {
    let (store, scan_id) = seeded_store();
    let target_id = TargetId::new();
    let result = TargetScanResult::new(
        TargetScanResultId::new(),
        scan_id,
        target_id,
        enabled_status(),
    );
    store.post_scan_result(&result).await.unwrap();

    let mut patch = TargetScanStatusPatch::default();
    patch.families.insert(AnalyzerFamily::Sbom, vmscan_core::SubStatus::new(vmscan_core::FamilyState::Done));
    let status = store.patch_target_scan_status(&result.id, &patch).await.unwrap();
    assert_eq!(status.families[&AnalyzerFamily::Sbom].state, Some(vmscan_core::FamilyState::Done));
}
