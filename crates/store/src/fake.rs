// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory [`BackendStore`] double used by this crate's own tests and
//! by `vmscan-engine`'s controller/pipeline tests (SPEC_FULL.md §8).

use crate::{BackendStore, PostScanResultOutcome, StoreError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use vmscan_core::{
    Scan, ScanId, ScanPatch, ScanSummary, Target, TargetId, TargetScanResult, TargetScanResultId,
    TargetScanStatus, TargetScanStatusPatch,
};

#[derive(Default)]
struct State {
    scans: HashMap<ScanId, Scan>,
    results: HashMap<TargetScanResultId, TargetScanResult>,
    /// (scan, target) -> result id, so `post_scan_result` can detect a
    /// pre-existing record and behave as an idempotent create.
    result_index: HashMap<(ScanId, TargetId), TargetScanResultId>,
    calls: Vec<String>,
    patch_scan_failures: usize,
    patch_status_failures: usize,
}

/// An in-memory backend store. Clone it freely; clones share state.
#[derive(Clone, Default)]
pub struct FakeBackendStore {
    state: std::sync::Arc<Mutex<State>>,
}

impl FakeBackendStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_scan(&self, scan: Scan) {
        self.state.lock().scans.insert(scan.id.clone(), scan);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// The next N calls to `patch_scan` fail with [`StoreError::Request`]
    /// (SPEC_FULL.md §7 error kind 3: "store failure on summary PATCH").
    pub fn fail_next_patch_scan(&self, times: usize) {
        self.state.lock().patch_scan_failures = times;
    }

    pub fn fail_next_patch_status(&self, times: usize) {
        self.state.lock().patch_status_failures = times;
    }

    pub fn result(&self, id: &TargetScanResultId) -> Option<TargetScanResult> {
        self.state.lock().results.get(id).cloned()
    }

    /// Test-only helper standing in for the scanner CLI reporting findings
    /// into a target's result (out of scope for this crate, SPEC_FULL.md §2).
    pub fn set_result_summary(&self, id: &TargetScanResultId, summary: ScanSummary) {
        if let Some(result) = self.state.lock().results.get_mut(id) {
            result.summary = summary;
        }
    }
}

#[async_trait]
impl BackendStore for FakeBackendStore {
    async fn get_scan(&self, id: &ScanId) -> Result<Scan, StoreError> {
        let mut state = self.state.lock();
        state.calls.push(format!("get_scan({id})"));
        state
            .scans
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { resource: "scan", id: id.to_string() })
    }

    async fn patch_scan(&self, id: &ScanId, patch: &ScanPatch) -> Result<Scan, StoreError> {
        let mut state = self.state.lock();
        state.calls.push(format!("patch_scan({id})"));
        if state.patch_scan_failures > 0 {
            state.patch_scan_failures -= 1;
            return Err(StoreError::Request("injected failure".into()));
        }
        let scan = state
            .scans
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound { resource: "scan", id: id.to_string() })?;
        apply_scan_patch(scan, patch);
        Ok(scan.clone())
    }

    async fn post_scan_result(
        &self,
        result: &TargetScanResult,
    ) -> Result<PostScanResultOutcome, StoreError> {
        let mut state = self.state.lock();
        state.calls.push(format!("post_scan_result({}, {})", result.scan_id, result.target_id));
        let key = (result.scan_id.clone(), result.target_id.clone());
        if let Some(existing) = state.result_index.get(&key) {
            return Ok(PostScanResultOutcome::AlreadyExists(existing.clone()));
        }
        state.result_index.insert(key, result.id.clone());
        state.results.insert(result.id.clone(), result.clone());
        Ok(PostScanResultOutcome::Created(result.id.clone()))
    }

    async fn get_scan_result_summary(&self, id: &TargetScanResultId) -> Result<ScanSummary, StoreError> {
        let mut state = self.state.lock();
        state.calls.push(format!("get_scan_result_summary({id})"));
        state
            .results
            .get(id)
            .map(|r| r.summary.clone())
            .ok_or_else(|| StoreError::NotFound { resource: "target scan result", id: id.to_string() })
    }

    async fn get_scan_result_status(&self, id: &TargetScanResultId) -> Result<TargetScanStatus, StoreError> {
        let mut state = self.state.lock();
        state.calls.push(format!("get_scan_result_status({id})"));
        state
            .results
            .get(id)
            .map(|r| r.status.clone())
            .ok_or_else(|| StoreError::NotFound { resource: "target scan result", id: id.to_string() })
    }

    async fn patch_target_scan_status(
        &self,
        id: &TargetScanResultId,
        patch: &TargetScanStatusPatch,
    ) -> Result<TargetScanStatus, StoreError> {
        let mut state = self.state.lock();
        state.calls.push(format!("patch_target_scan_status({id})"));
        if state.patch_status_failures > 0 {
            state.patch_status_failures -= 1;
            return Err(StoreError::Request("injected failure".into()));
        }
        let result = state
            .results
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound { resource: "target scan result", id: id.to_string() })?;
        if let Some(general) = patch.general {
            result.status.general = general;
        }
        for (family, sub) in &patch.families {
            result.status.families.insert(*family, sub.clone());
        }
        Ok(result.status.clone())
    }
}

fn apply_scan_patch(scan: &mut Scan, patch: &ScanPatch) {
    if let Some(summary) = patch.summary.clone() {
        scan.summary = summary;
    }
    if let Some(state) = patch.state {
        scan.state = state;
    }
    if let Some(reason) = patch.state_reason {
        scan.state_reason = Some(reason);
    }
    if let Some(message) = patch.state_message.clone() {
        scan.state_message = Some(message);
    }
    if let Some(end_time) = patch.end_time {
        scan.end_time = Some(end_time);
    }
}

/// Helper for tests that need a `Target` without a real provider.
pub fn fake_target(id: &str, region: &str, availability_zone: &str) -> Target {
    Target::new(
        TargetId::from_string(format!("tgt-{id}")),
        region.to_string(),
        vmscan_core::InstanceId::new(format!("i-{id}")),
        availability_zone.to_string(),
    )
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
