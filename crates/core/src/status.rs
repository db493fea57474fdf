// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-target status: the general state machine plus per-family sub-states.

use crate::family::AnalyzerFamily;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single sub-state, shared shape for the general state and every
/// per-family state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FamilyState {
    Init,
    Attached,
    InProgress,
    Aborted,
    Done,
    NotScanned,
}

impl FamilyState {
    pub fn is_terminal(self) -> bool {
        matches!(self, FamilyState::Done | FamilyState::NotScanned)
    }
}

/// One analyzer family's reported state plus any errors it surfaced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubStatus {
    pub state: Option<FamilyState>,
    pub errors: Vec<String>,
}

impl SubStatus {
    pub fn new(state: FamilyState) -> Self {
        Self { state: Some(state), errors: Vec::new() }
    }

    pub fn not_scanned() -> Self {
        Self::new(FamilyState::NotScanned)
    }

    pub fn init() -> Self {
        Self::new(FamilyState::Init)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// The coarse machine the orchestrator drives, plus one sub-state per
/// analyzer family reported by the scanner CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetScanStatus {
    pub general: FamilyState,
    pub families: BTreeMap<AnalyzerFamily, SubStatus>,
}

impl TargetScanStatus {
    /// Build initial status: general INIT, each family INIT if enabled,
    /// NOTSCANNED if not.
    pub fn initial(enabled: impl Iterator<Item = AnalyzerFamily>) -> Self {
        let enabled: std::collections::BTreeSet<_> = enabled.collect();
        let families = AnalyzerFamily::ALL
            .into_iter()
            .map(|family| {
                let sub =
                    if enabled.contains(&family) { SubStatus::init() } else { SubStatus::not_scanned() };
                (family, sub)
            })
            .collect();
        Self { general: FamilyState::Init, families }
    }

    /// True once `general` reflects a terminal outcome for this target.
    pub fn is_general_terminal(&self) -> bool {
        self.general.is_terminal()
    }

    /// A target "has no errors" iff none of its sub-states carry an error.
    pub fn has_any_errors(&self) -> bool {
        self.families.values().any(SubStatus::has_errors)
    }
}

/// A partial update to a [`TargetScanStatus`], PATCH semantics: only fields
/// present are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetScanStatusPatch {
    pub general: Option<FamilyState>,
    /// Per-family patches; a family absent here is left untouched.
    pub families: BTreeMap<AnalyzerFamily, SubStatus>,
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
