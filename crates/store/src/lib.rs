// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vmscan-store: the backend store client boundary (SPEC_FULL.md §6).
//!
//! The backend store (HTTP REST API + persistence) is external to this
//! system — see SPEC_FULL.md §2, "out of scope". This crate only defines
//! the CRUD surface the engine relies on and, behind `test-support`, an
//! in-memory double that engine tests run against.

pub mod error;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use error::StoreError;

use async_trait::async_trait;
use vmscan_core::{
    ScanId, ScanPatch, ScanSummary, TargetScanResult, TargetScanResultId, TargetScanStatus,
    TargetScanStatusPatch,
};

/// Outcome of [`BackendStore::post_scan_result`]: the store may already hold
/// a result for this (scan, target) pair, in which case the create is a
/// no-op and the pre-existing identifier is adopted (SPEC_FULL.md §4.1
/// Initialization, §8 scenario 6 "idempotent create").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostScanResultOutcome {
    Created(TargetScanResultId),
    AlreadyExists(TargetScanResultId),
}

impl PostScanResultOutcome {
    pub fn id(&self) -> &TargetScanResultId {
        match self {
            PostScanResultOutcome::Created(id) => id,
            PostScanResultOutcome::AlreadyExists(id) => id,
        }
    }
}

/// The scan orchestrator's view of the backend store: CRUD over scans,
/// per-target scan results, and their sub-status, all via PATCH-style
/// partial updates (SPEC_FULL.md §6).
#[async_trait]
pub trait BackendStore: Send + Sync {
    async fn get_scan(&self, id: &ScanId) -> Result<vmscan_core::Scan, StoreError>;

    async fn patch_scan(&self, id: &ScanId, patch: &ScanPatch) -> Result<vmscan_core::Scan, StoreError>;

    /// Idempotent: a conflict response adopts the existing identifier
    /// rather than erroring.
    async fn post_scan_result(
        &self,
        result: &TargetScanResult,
    ) -> Result<PostScanResultOutcome, StoreError>;

    async fn get_scan_result_summary(&self, id: &TargetScanResultId) -> Result<ScanSummary, StoreError>;

    async fn get_scan_result_status(
        &self,
        id: &TargetScanResultId,
    ) -> Result<TargetScanStatus, StoreError>;

    async fn patch_target_scan_status(
        &self,
        id: &TargetScanResultId,
        patch: &TargetScanStatusPatch,
    ) -> Result<TargetScanStatus, StoreError>;
}
