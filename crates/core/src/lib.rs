// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vmscan-core: domain model for the agentless VM security scan orchestrator.
//!
//! This crate holds pure data: scans, targets, results, status machines,
//! configuration and identifiers. It has no knowledge of cloud APIs, HTTP,
//! or concurrency — those live in `vmscan-provider`, `vmscan-store` and
//! `vmscan-engine` respectively.

pub mod clock;
pub mod config;
pub mod error;
pub mod family;
pub mod id;
pub mod ids;
pub mod job;
pub mod scan;
pub mod status;
pub mod target;
pub mod target_scan_result;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ScanConfig, SNAPSHOT_COPY_TIMEOUT, SNAPSHOT_READY_TIMEOUT};
pub use error::FailureKind;
pub use family::{AnalyzerFamily, FamilyParams, FamilyToggles};
pub use ids::{InstanceId, ScanId, SnapshotId, TargetId, TargetScanResultId, VolumeId};
pub use job::{DeletePolicy, Job};
pub use scan::{Scan, ScanPatch, ScanState, ScanStateReason, ScanSummary, VulnerabilitySeverityCounts};
pub use status::{FamilyState, SubStatus, TargetScanStatus, TargetScanStatusPatch};
pub use target::Target;
pub use target_scan_result::TargetScanResult;
