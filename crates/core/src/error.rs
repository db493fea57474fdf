// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error kind used where downstream crates need to classify a
//! failure without matching on another crate's internal error variants
//! (§7 ADDED: error handling).

use thiserror::Error;

/// Coarse classification of why a scan job step failed, independent of
/// which crate raised it. The controller matches on this, never on a
/// provider- or store-specific error enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FailureKind {
    #[error("transient cloud provider failure")]
    TransientProvider,
    #[error("resource readiness timed out")]
    ResourceTimeout,
    #[error("backend store call failed")]
    Store,
    #[error("scan cancelled")]
    Cancelled,
    #[error("unexpected failure")]
    Unexpected,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
