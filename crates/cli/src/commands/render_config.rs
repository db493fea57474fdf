// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vmscan render-config` - render the per-family YAML document handed to
//! the scanner CLI, from a scan config TOML file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;

use vmscan_core::ScanConfig;
use vmscan_engine::render_family_config_yaml;

#[derive(Args)]
pub struct RenderConfigArgs {
    /// TOML file with a `ScanConfig` (the `targets` array, if present, is ignored).
    #[arg(long)]
    pub config: PathBuf,
}

#[derive(Deserialize)]
struct ConfigOnly {
    #[serde(flatten)]
    config: ScanConfig,
}

pub async fn run(args: RenderConfigArgs) -> Result<()> {
    let raw = std::fs::read_to_string(&args.config)
        .with_context(|| format!("reading {}", args.config.display()))?;
    let parsed: ConfigOnly = toml::from_str(&raw).context("parsing scan config")?;
    let yaml = render_family_config_yaml(&parsed.config.families).context("rendering family config")?;
    print!("{yaml}");
    Ok(())
}
