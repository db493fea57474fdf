// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The orchestrator's configuration surface (§6).

use crate::family::FamilyToggles;
use crate::job::DeletePolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_device_name() -> String {
    "/dev/sdf".to_string()
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(15)
}

fn default_result_timeout() -> Duration {
    Duration::from_secs(60 * 60)
}

/// User-supplied configuration for a single scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Region the scanner fleet runs in; snapshots are copied here when a
    /// target lives elsewhere.
    pub region: String,
    /// K: the maximum number of scan jobs run concurrently.
    pub max_parallel_scanners: usize,
    /// Tick interval the result waiter polls target status on.
    #[serde(with = "humantime_serde")]
    pub job_results_polling_interval: Duration,
    /// Overall deadline the result waiter enforces per target.
    #[serde(with = "humantime_serde")]
    pub job_result_timeout: Duration,
    /// Retention policy for provisioned cloud resources.
    pub delete_job_policy: DeletePolicy,
    /// Block device name the scanner attaches the target's volume at.
    #[serde(default = "default_device_name")]
    pub device_name: String,
    /// Which analyzer families run, and with what parameters.
    pub families: FamilyToggles,
}

impl ScanConfig {
    pub fn new(region: impl Into<String>, max_parallel_scanners: usize) -> Self {
        Self {
            region: region.into(),
            max_parallel_scanners,
            job_results_polling_interval: default_poll_interval(),
            job_result_timeout: default_result_timeout(),
            delete_job_policy: DeletePolicy::Always,
            device_name: default_device_name(),
            families: FamilyToggles::new(),
        }
    }
}

/// Bounded timeouts for the two cross-cutting long-latency pipeline steps
/// (§4.3): fixed per spec, not user-configurable.
pub const SNAPSHOT_READY_TIMEOUT: Duration = Duration::from_secs(3 * 60);
pub const SNAPSHOT_COPY_TIMEOUT: Duration = Duration::from_secs(15 * 60);

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
