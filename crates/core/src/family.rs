// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Analyzer families and the per-family capability lookup.
//!
//! Per the design note on replacing repeated `config != nil && *config.Enabled`
//! checks, every place that needs to know whether a family is enabled goes
//! through [`FamilyToggles::is_enabled`] rather than matching on the family
//! variant directly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A category of security analyzer run against the mounted filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerFamily {
    Sbom,
    Vulnerabilities,
    Secrets,
    Exploits,
    Malware,
    Misconfigurations,
    Rootkits,
}

impl AnalyzerFamily {
    /// All families, in the order the scanner CLI runs them.
    pub const ALL: [AnalyzerFamily; 7] = [
        AnalyzerFamily::Sbom,
        AnalyzerFamily::Vulnerabilities,
        AnalyzerFamily::Secrets,
        AnalyzerFamily::Exploits,
        AnalyzerFamily::Malware,
        AnalyzerFamily::Misconfigurations,
        AnalyzerFamily::Rootkits,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            AnalyzerFamily::Sbom => "sbom",
            AnalyzerFamily::Vulnerabilities => "vulnerabilities",
            AnalyzerFamily::Secrets => "secrets",
            AnalyzerFamily::Exploits => "exploits",
            AnalyzerFamily::Malware => "malware",
            AnalyzerFamily::Misconfigurations => "misconfigurations",
            AnalyzerFamily::Rootkits => "rootkits",
        }
    }
}

impl fmt::Display for AnalyzerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Per-family enable flag and scanner parameters, keyed by family tag.
///
/// `exploits` implicitly depends on `vulnerabilities` output (§4.7) but its
/// enablement is independent: a scan may run vulnerabilities without
/// exploits, never the reverse in a way that produces findings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FamilyToggles {
    enabled: std::collections::BTreeMap<AnalyzerFamily, FamilyParams>,
}

/// Per-family scanner selection and endpoint configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FamilyParams {
    /// Tool identifiers to run for this family (empty means "use defaults").
    pub scanners: Vec<String>,
    /// Binary paths and remote endpoints keyed by scanner name.
    pub scanner_config: std::collections::BTreeMap<String, String>,
    /// Remote server address for families that support a remote mode
    /// (currently only vulnerabilities/Grype).
    pub remote_server: Option<String>,
}

impl FamilyToggles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable a family with the given parameters.
    pub fn enable(&mut self, family: AnalyzerFamily, params: FamilyParams) -> &mut Self {
        self.enabled.insert(family, params);
        self
    }

    pub fn is_enabled(&self, family: AnalyzerFamily) -> bool {
        self.enabled.contains_key(&family)
    }

    pub fn params(&self, family: AnalyzerFamily) -> Option<&FamilyParams> {
        self.enabled.get(&family)
    }

    /// Families enabled in this toggle set, in canonical order.
    pub fn enabled_families(&self) -> impl Iterator<Item = AnalyzerFamily> + '_ {
        AnalyzerFamily::ALL.into_iter().filter(move |f| self.is_enabled(*f))
    }
}

#[cfg(test)]
#[path = "family_tests.rs"]
mod tests;
