// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The live, handle-bearing counterpart to [`vmscan_core::Job`].
//!
//! `vmscan_core::Job` records the spec's abstract data shape (bare
//! provider-assigned ids) for logging and external visibility. Internally
//! the pipeline and reaper need the actual cloud handles to call `delete`
//! on, so this crate keeps its own `Job` holding the boxed trait objects
//! returned by each provisioning step. Never persisted externally, exactly
//! as SPEC_FULL.md's Job entry describes.

use vmscan_provider::{Instance, Snapshot, Volume};

/// Resources provisioned for one target's scan job, recorded as each
/// fallible pipeline step succeeds so a failure partway through can always
/// find what to clean up.
#[derive(Default)]
pub struct Job {
    pub instance: Option<Box<dyn Instance>>,
    pub source_snapshot: Option<Box<dyn Snapshot>>,
    pub destination_snapshot: Option<Box<dyn Snapshot>>,
    pub volume: Option<Box<dyn Volume>>,
}

impl Job {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.instance.is_none()
            && self.source_snapshot.is_none()
            && self.destination_snapshot.is_none()
            && self.volume.is_none()
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
