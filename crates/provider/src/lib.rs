// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vmscan-provider: the cloud adapter boundary the scan engine talks to.
//!
//! `Provider`, `Instance`, `Volume` and `Snapshot` are the only things the
//! engine knows about the cloud. A real implementation of this crate (not
//! included here — see SPEC_FULL.md §2, "Cloud provider adapter" is external)
//! would wrap a cloud SDK; [`fake`] supplies an in-memory double the engine's
//! own tests run against.

pub mod context;
pub mod error;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use context::ScanContext;
pub use error::ProviderError;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;
use vmscan_core::{InstanceId, SnapshotId, VolumeId};

/// Parameters for launching a disposable scanner worker instance
/// (SPEC_FULL.md §6, `Provider.RunScanningJob`).
#[derive(Debug, Clone)]
pub struct ScannerJobConfig {
    pub scanner_image: String,
    pub instance_type: String,
    pub key_pair_name: String,
    pub backend_address: String,
    /// Rendered family configuration (see `vmscan-engine`'s translator).
    pub family_config_yaml: String,
    pub tags: BTreeMap<String, String>,
}

/// A disposable cloud snapshot of a target's root volume.
#[async_trait]
pub trait Snapshot: Send + Sync {
    fn id(&self) -> &SnapshotId;
    fn region(&self) -> &str;

    /// Blocks (cooperatively, honoring `ctx`) until the snapshot has left
    /// the `pending` state, or returns [`ProviderError::ReadinessTimeout`]
    /// after `timeout`.
    async fn wait_for_ready(&self, ctx: &ScanContext, timeout: Duration) -> Result<(), ProviderError>;

    /// Copies the snapshot into `region`, returning the copy's own handle.
    async fn copy(&self, ctx: &ScanContext, region: &str) -> Result<Box<dyn Snapshot>, ProviderError>;

    /// Materializes a new volume from this snapshot in `availability_zone`.
    async fn create_volume(
        &self,
        ctx: &ScanContext,
        availability_zone: &str,
    ) -> Result<Box<dyn Volume>, ProviderError>;

    async fn delete(&self, ctx: &ScanContext) -> Result<(), ProviderError>;
}

/// A cloud block volume, either a target's root volume or one materialized
/// from a snapshot for attachment to a scanner worker.
#[async_trait]
pub trait Volume: Send + Sync {
    fn id(&self) -> &VolumeId;

    async fn take_snapshot(&self, ctx: &ScanContext) -> Result<Box<dyn Snapshot>, ProviderError>;

    /// Blocks until the volume reports `attached`.
    async fn wait_for_attached(&self, ctx: &ScanContext) -> Result<(), ProviderError>;

    async fn delete(&self, ctx: &ScanContext) -> Result<(), ProviderError>;
}

/// A cloud compute instance: either a scan target, or a disposable scanner
/// worker the provider launched on the orchestrator's behalf.
#[async_trait]
pub trait Instance: Send + Sync {
    fn id(&self) -> &InstanceId;
    fn region(&self) -> &str;
    fn availability_zone(&self) -> &str;

    async fn get_root_volume(&self, ctx: &ScanContext) -> Result<Box<dyn Volume>, ProviderError>;

    /// Blocks until the instance is running and reachable.
    async fn wait_for_ready(&self, ctx: &ScanContext) -> Result<(), ProviderError>;

    async fn attach_volume(
        &self,
        ctx: &ScanContext,
        volume: &dyn Volume,
        device_name: &str,
    ) -> Result<(), ProviderError>;

    async fn delete(&self, ctx: &ScanContext) -> Result<(), ProviderError>;
}

/// The cloud account/region the orchestrator runs against.
#[async_trait]
pub trait Provider: Send + Sync {
    fn region(&self) -> &str;

    /// Builds a handle to an already-existing instance (a scan target)
    /// from its provider-assigned id. Purely local — no cloud call — the
    /// handle is what the job pipeline then calls `get_root_volume` on.
    fn existing_instance(
        &self,
        id: &InstanceId,
        region: &str,
        availability_zone: &str,
    ) -> Box<dyn Instance>;

    /// Launches a scanner worker instance that boots from `snapshot_id`
    /// and is configured to run the job described by `job_config`.
    async fn run_scanning_job(
        &self,
        ctx: &ScanContext,
        region: &str,
        snapshot_id: &SnapshotId,
        job_config: &ScannerJobConfig,
    ) -> Result<Box<dyn Instance>, ProviderError>;
}
