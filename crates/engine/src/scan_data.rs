// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-target controller state.
//!
//! SPEC_FULL.md §9 flags the original design's shared `{success, completed,
//! timeout}` flags, mutated under a scan-wide mutex, for replacement: here
//! `ScanData` is an immutable record the controller owns for the life of a
//! dispatch, and the worker's progress signal travels as one message on the
//! completion channel instead. No scan-wide mutex exists anywhere in this
//! crate.

use vmscan_core::{Target, TargetScanResultId};

/// Immutable per-target record the controller builds during initialization
/// and hands to exactly one worker via the dispatch queue.
#[derive(Debug, Clone)]
pub struct ScanData {
    pub target: Target,
    pub result_id: TargetScanResultId,
}

/// The single message a worker sends back once a target's scan job has
/// reached a conclusion — success, failure, or waiter timeout.
#[derive(Debug, Clone)]
pub struct CompletionMessage {
    pub target_id: vmscan_core::TargetId,
    pub result_id: TargetScanResultId,
    pub success: bool,
    pub timed_out: bool,
}

#[cfg(test)]
#[path = "scan_data_tests.rs"]
mod tests;
