// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The top-level scan record and its aggregated summary.

use crate::ids::ScanId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse lifecycle state of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanState {
    Pending,
    InProgress,
    Failed,
    Done,
}

/// Why a scan reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanStateReason {
    Success,
    OneOrMoreTargetsFailed,
    Aborted,
    TimedOut,
    Unexpected,
}

/// Per-severity vulnerability counts. Each bucket is its own accumulator —
/// see SPEC_FULL.md §3/§4.8 on the negligible/critical roll-up bug this
/// contract corrects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnerabilitySeverityCounts {
    pub critical: u64,
    pub high: u64,
    pub medium: u64,
    pub low: u64,
    pub negligible: u64,
}

impl VulnerabilitySeverityCounts {
    pub fn add(&mut self, other: &VulnerabilitySeverityCounts) {
        self.critical += other.critical;
        self.high += other.high;
        self.medium += other.medium;
        self.low += other.low;
        self.negligible += other.negligible;
    }
}

/// Aggregated finding counts, shared shape between a [`crate::TargetScanResult`]
/// and the scan it rolls up into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub exploits: u64,
    pub malware: u64,
    pub misconfigurations: u64,
    pub packages: u64,
    pub rootkits: u64,
    pub secrets: u64,
    pub vulnerabilities: VulnerabilitySeverityCounts,
    pub jobs_completed: u64,
    pub jobs_left_to_run: u64,
}

impl ScanSummary {
    pub fn zeroed(total_targets: u64) -> Self {
        Self { jobs_left_to_run: total_targets, ..Default::default() }
    }

    /// Fold a single target's finding counts into this summary.
    ///
    /// Does not touch `jobs_completed`/`jobs_left_to_run`: those are
    /// dispatch bookkeeping owned by the controller's completion loop, not a
    /// function of any one target's result (SPEC_FULL.md §4.8).
    pub fn add_findings(&mut self, other: &ScanSummary) {
        self.exploits += other.exploits;
        self.malware += other.malware;
        self.misconfigurations += other.misconfigurations;
        self.packages += other.packages;
        self.rootkits += other.rootkits;
        self.secrets += other.secrets;
        self.vulnerabilities.add(&other.vulnerabilities);
    }
}

/// A user-initiated top-level scan covering N targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scan {
    pub id: ScanId,
    pub summary: ScanSummary,
    pub state: ScanState,
    pub state_reason: Option<ScanStateReason>,
    pub state_message: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl Scan {
    pub fn new(id: ScanId, total_targets: u64, start_time: DateTime<Utc>) -> Self {
        Self {
            id,
            summary: ScanSummary::zeroed(total_targets),
            state: ScanState::Pending,
            state_reason: None,
            state_message: None,
            start_time,
            end_time: None,
        }
    }
}

/// A partial update applied to a [`Scan`] via PATCH semantics: `None` fields
/// are left untouched (last-writer-wins only on fields actually supplied).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanPatch {
    pub summary: Option<ScanSummary>,
    pub state: Option<ScanState>,
    pub state_reason: Option<ScanStateReason>,
    pub state_message: Option<String>,
    pub end_time: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
