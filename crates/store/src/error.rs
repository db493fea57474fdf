// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by the backend store client.

use thiserror::Error;

/// Errors a [`crate::BackendStore`] call can raise.
///
/// There is deliberately no `Conflict` variant: `post_scan_result`'s
/// idempotent-create semantics (SPEC_FULL.md §6) surface a conflict as a
/// successful [`crate::PostScanResultOutcome::AlreadyExists`], not an error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("backend store request failed: {0}")]
    Request(String),

    #[error("backend store response could not be decoded: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn classify(&self) -> vmscan_core::FailureKind {
        vmscan_core::FailureKind::Store
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
