// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Translates enabled analyzer families into the YAML blob handed to the
//! scanner CLI (SPEC_FULL.md §4.7). The document is opaque to the rest of
//! the orchestrator once rendered.

use serde::Serialize;
use std::collections::BTreeMap;
use vmscan_core::{AnalyzerFamily, FamilyToggles};

const DEFAULT_VULN_DB_LISTING_URL: &str = "https://vulnerability-db.internal/listing.json";
const SQUASHED_LAYER_SCOPE: &str = "SQUASHED";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
enum VulnerabilityMode {
    Remote,
    Local,
}

#[derive(Debug, Clone, Serialize)]
struct FamilyConfigEntry {
    enabled: bool,
    #[serde(rename = "scanners-list")]
    scanners_list: Vec<String>,
    #[serde(rename = "scanners-config")]
    scanners_config: BTreeMap<String, String>,
    /// Always null at dispatch time; populated later by the scanner CLI
    /// once the volume is mounted.
    inputs: Option<()>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<VulnerabilityMode>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "db-listing-url")]
    db_listing_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "layer-scope")]
    layer_scope: Option<String>,
}

impl FamilyConfigEntry {
    fn for_family(family: AnalyzerFamily, toggles: &FamilyToggles) -> Self {
        let params = toggles.params(family).cloned().unwrap_or_default();
        let mut entry = FamilyConfigEntry {
            enabled: true,
            scanners_list: params.scanners,
            scanners_config: params.scanner_config,
            inputs: None,
            mode: None,
            db_listing_url: None,
            layer_scope: None,
        };
        if family == AnalyzerFamily::Vulnerabilities {
            match params.remote_server {
                Some(server) => {
                    entry.mode = Some(VulnerabilityMode::Remote);
                    entry.db_listing_url = Some(server);
                }
                None => {
                    entry.mode = Some(VulnerabilityMode::Local);
                    entry.db_listing_url = Some(DEFAULT_VULN_DB_LISTING_URL.to_string());
                    entry.layer_scope = Some(SQUASHED_LAYER_SCOPE.to_string());
                }
            }
        }
        entry
    }
}

/// Render the enabled families' configuration as YAML, keyed by family tag.
/// Map key order is alphabetical and has no bearing on scan order: the
/// scanner CLI looks up each family by tag and always runs exploits after
/// vulnerabilities regardless of where either key falls in the document.
pub fn render_family_config_yaml(toggles: &FamilyToggles) -> Result<String, serde_yaml::Error> {
    let document: BTreeMap<&'static str, FamilyConfigEntry> = toggles
        .enabled_families()
        .map(|family| (family.tag(), FamilyConfigEntry::for_family(family, toggles)))
        .collect();
    serde_yaml::to_string(&document)
}

#[cfg(test)]
#[path = "family_config_tests.rs"]
mod tests;
