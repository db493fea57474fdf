// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vmscan-engine: the scan controller, worker pool, job pipeline and result
//! waiter that together drive one scan from kickoff to terminal state
//! (SPEC_FULL.md §4).

pub mod controller;
pub mod error;
pub mod family_config;
pub mod job;
pub mod pipeline;
pub mod reaper;
pub mod scan_data;
pub mod waiter;
pub mod worker;

pub use controller::run as run_scan;
pub use error::{ControllerError, PipelineError};
pub use family_config::render_family_config_yaml;
pub use job::Job;
pub use scan_data::{CompletionMessage, ScanData};
pub use waiter::WaitOutcome;
