// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vmscan scan` - drive the engine through a full scan.
//!
//! The production cloud adapter and backend store are external to this
//! crate (SPEC_FULL.md §2: "Provider" and "BackendStore" are integration
//! points, not bundled implementations). This command runs the real
//! controller/pipeline/worker/waiter stack against the in-memory fakes, so
//! the 9-step pipeline can be exercised end to end without either one.
//! A watcher task stands in for the scanner CLI, reporting each target DONE
//! once its volume is attached.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::info;

use vmscan_core::{
    FamilyState, Scan, ScanConfig, ScanId, Target, TargetScanResult, TargetScanResultId,
    TargetScanStatus, TargetScanStatusPatch,
};
use vmscan_provider::fake::FakeProvider;
use vmscan_provider::{Provider, ScanContext};
use vmscan_store::fake::FakeBackendStore;
use vmscan_store::BackendStore;

use crate::output::{print_or_json, OutputFormat};

#[derive(Args)]
pub struct ScanArgs {
    /// TOML file with a `ScanConfig` plus a `targets` array.
    #[arg(long)]
    pub config: PathBuf,
}

#[derive(Deserialize)]
struct ScanRunConfig {
    #[serde(flatten)]
    config: ScanConfig,
    targets: Vec<Target>,
}

#[derive(Serialize)]
struct ScanReport {
    scan_id: String,
    state: vmscan_core::ScanState,
    state_reason: Option<vmscan_core::ScanStateReason>,
    jobs_completed: u64,
    jobs_left_to_run: u64,
}

impl From<&Scan> for ScanReport {
    fn from(scan: &Scan) -> Self {
        Self {
            scan_id: scan.id.to_string(),
            state: scan.state,
            state_reason: scan.state_reason,
            jobs_completed: scan.summary.jobs_completed,
            jobs_left_to_run: scan.summary.jobs_left_to_run,
        }
    }
}

pub async fn run(args: ScanArgs, format: OutputFormat) -> Result<()> {
    let raw = std::fs::read_to_string(&args.config)
        .with_context(|| format!("reading {}", args.config.display()))?;
    let run_config: ScanRunConfig = toml::from_str(&raw).context("parsing scan config")?;

    if run_config.targets.is_empty() {
        anyhow::bail!("scan config has no targets");
    }

    let provider = FakeProvider::new(run_config.config.region.clone());
    let store = FakeBackendStore::new();

    let scan_id = ScanId::new();
    store.seed_scan(Scan::new(scan_id.clone(), run_config.targets.len() as u64, chrono::Utc::now()));

    let mut result_ids = Vec::with_capacity(run_config.targets.len());
    for target in &run_config.targets {
        let status = TargetScanStatus::initial(run_config.config.families.enabled_families());
        let result =
            TargetScanResult::new(TargetScanResultId::new(), scan_id.clone(), target.id.clone(), status);
        let outcome = store.post_scan_result(&result).await.context("seeding scan result")?;
        result_ids.push(outcome.id().clone());
    }

    let watchers: Vec<_> = result_ids
        .iter()
        .cloned()
        .map(|id| tokio::spawn(report_done_once_attached(store.clone(), id)))
        .collect();

    info!(scan_id = %scan_id, target_count = run_config.targets.len(), "starting scan");

    let provider: Arc<dyn Provider> = Arc::new(provider);
    let store_handle: Arc<dyn BackendStore> = Arc::new(store);
    let scan = vmscan_engine::run_scan(
        ScanContext::new(),
        provider,
        store_handle,
        run_config.config,
        scan_id,
        run_config.targets,
    )
    .await
    .context("running scan")?;

    for watcher in watchers {
        watcher.abort();
    }

    print_or_json(format, &ScanReport::from(&scan), |report| {
        println!("scan {} -> {:?} ({:?})", report.scan_id, report.state, report.state_reason);
        println!("jobs completed: {}, left to run: {}", report.jobs_completed, report.jobs_left_to_run);
    })
}

async fn report_done_once_attached(store: FakeBackendStore, result_id: TargetScanResultId) {
    loop {
        if let Ok(status) = store.get_scan_result_status(&result_id).await {
            if status.general == FamilyState::Attached {
                let patch = TargetScanStatusPatch { general: Some(FamilyState::Done), families: Default::default() };
                let _ = store.patch_target_scan_status(&result_id, &patch).await;
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}
