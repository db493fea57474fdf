// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The cancellation-capable context threaded through every provider call.

use tokio_util::sync::CancellationToken;

/// A scan-scoped cancellation token (the "kill signal" of SPEC_FULL.md §5),
/// cloned down into every worker and every cloud call. Cancelling the root
/// token cancels every clone; clones never cancel their parent.
#[derive(Clone)]
pub struct ScanContext {
    cancellation: CancellationToken,
}

impl ScanContext {
    pub fn new() -> Self {
        Self { cancellation: CancellationToken::new() }
    }

    pub fn from_token(cancellation: CancellationToken) -> Self {
        Self { cancellation }
    }

    /// A child context: cancelling it does not cancel `self`, but cancelling
    /// `self` cancels it.
    pub fn child(&self) -> Self {
        Self { cancellation: self.cancellation.child_token() }
    }

    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub async fn cancelled(&self) {
        self.cancellation.cancelled().await;
    }
}

impl Default for ScanContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
