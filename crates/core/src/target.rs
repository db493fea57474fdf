// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A scannable cloud workload.

use crate::ids::{InstanceId, TargetId};
use serde::{Deserialize, Serialize};

/// Representation of a scannable cloud workload (a VM instance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub region: String,
    pub instance: InstanceId,
    pub availability_zone: String,
}

impl Target {
    pub fn new(
        id: TargetId,
        region: impl Into<String>,
        instance: InstanceId,
        availability_zone: impl Into<String>,
    ) -> Self {
        Self { id, region: region.into(), instance, availability_zone: availability_zone.into() }
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
