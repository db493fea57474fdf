// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced while driving a scan.

use thiserror::Error;
use vmscan_core::FailureKind;
use vmscan_provider::ProviderError;
use vmscan_store::StoreError;

/// A single job pipeline/waiter failure, classified for the controller's
/// terminal-state computation (SPEC_FULL.md §7) without exposing which
/// crate raised it.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("cancelled")]
    Cancelled,

    #[error("{0}")]
    Unexpected(String),
}

impl PipelineError {
    pub fn classify(&self) -> FailureKind {
        match self {
            PipelineError::Provider(e) => e.classify(),
            PipelineError::Store(e) => e.classify(),
            PipelineError::Cancelled => FailureKind::Cancelled,
            PipelineError::Unexpected(_) => FailureKind::Unexpected,
        }
    }
}

/// Errors raised by [`crate::ScanController::run`] itself (not a single
/// target's pipeline, which fails privately onto its own status).
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
