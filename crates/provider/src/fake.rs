// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory [`Provider`] double used by this crate's own tests and by
//! `vmscan-engine`'s pipeline/controller tests (SPEC_FULL.md §8 scenarios).
//!
//! Every cloud primitive here is backed by one shared [`State`] so tests can
//! assert on call order, injected failures, and idempotent deletes without
//! touching a real cloud account.

use crate::{Instance, Provider, ProviderError, ScanContext, ScannerJobConfig, Snapshot, Volume};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use vmscan_core::{InstanceId, SnapshotId, VolumeId};

/// A point in the provider call sequence a test can make fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FailurePoint {
    RunScanningJob,
    GetRootVolume,
    TakeSnapshot,
    SnapshotWaitForReady,
    SnapshotCopy,
    SnapshotCreateVolume,
    InstanceWaitForReady,
    AttachVolume,
    VolumeWaitForAttached,
}

#[derive(Default)]
struct State {
    calls: Vec<String>,
    deleted_instances: BTreeSet<InstanceId>,
    deleted_volumes: BTreeSet<VolumeId>,
    deleted_snapshots: BTreeSet<SnapshotId>,
    failures: BTreeMap<FailurePoint, ProviderError>,
    /// Artificial latency injected before a wait/attach resolves, so tests
    /// can exercise cancellation and timeout races deterministically under
    /// `tokio::time::pause`.
    delays: BTreeMap<FailurePoint, Duration>,
}

struct Shared {
    state: Mutex<State>,
    next_id: AtomicU64,
}

impl Shared {
    fn record(&self, call: impl Into<String>) {
        self.state.lock().calls.push(call.into());
    }

    fn take_failure(&self, point: FailurePoint) -> Option<ProviderError> {
        self.state.lock().failures.remove(&point)
    }

    fn delay_for(&self, point: FailurePoint) -> Duration {
        self.state.lock().delays.get(&point).copied().unwrap_or_default()
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

/// Races `delay` against cancellation; a cancelled `ctx` always wins.
async fn wait_or_cancel(ctx: &ScanContext, delay: Duration) -> Result<(), ProviderError> {
    if delay.is_zero() {
        if ctx.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }
        return Ok(());
    }
    tokio::select! {
        _ = tokio::time::sleep(delay) => Ok(()),
        _ = ctx.cancelled() => Err(ProviderError::Cancelled),
    }
}

/// An in-memory cloud account. Clone it freely; clones share state.
#[derive(Clone)]
pub struct FakeProvider {
    region: String,
    shared: Arc<Shared>,
}

impl FakeProvider {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            shared: Arc::new(Shared { state: Mutex::new(State::default()), next_id: AtomicU64::new(0) }),
        }
    }

    pub fn inject_failure(&self, point: FailurePoint, err: ProviderError) {
        self.shared.state.lock().failures.insert(point, err);
    }

    pub fn inject_delay(&self, point: FailurePoint, delay: Duration) {
        self.shared.state.lock().delays.insert(point, delay);
    }

    pub fn calls(&self) -> Vec<String> {
        self.shared.state.lock().calls.clone()
    }

    pub fn is_instance_deleted(&self, id: &InstanceId) -> bool {
        self.shared.state.lock().deleted_instances.contains(id)
    }

    pub fn is_volume_deleted(&self, id: &VolumeId) -> bool {
        self.shared.state.lock().deleted_volumes.contains(id)
    }

    pub fn is_snapshot_deleted(&self, id: &SnapshotId) -> bool {
        self.shared.state.lock().deleted_snapshots.contains(id)
    }

    /// Builds a root-volume-bearing target instance, the seed for a scan's
    /// job pipeline. Not part of `Provider` itself — targets pre-exist in
    /// the account, they aren't launched by a scanning job.
    pub fn seed_target_instance(&self, region: &str, availability_zone: &str) -> FakeInstance {
        let id = InstanceId::from(self.shared.next_id("i"));
        FakeInstance {
            id,
            region: region.to_string(),
            availability_zone: availability_zone.to_string(),
            shared: self.shared.clone(),
        }
    }
}

#[async_trait]
impl Provider for FakeProvider {
    fn region(&self) -> &str {
        &self.region
    }

    fn existing_instance(&self, id: &InstanceId, region: &str, availability_zone: &str) -> Box<dyn Instance> {
        Box::new(FakeInstance {
            id: id.clone(),
            region: region.to_string(),
            availability_zone: availability_zone.to_string(),
            shared: self.shared.clone(),
        })
    }

    async fn run_scanning_job(
        &self,
        ctx: &ScanContext,
        region: &str,
        snapshot_id: &SnapshotId,
        _job_config: &ScannerJobConfig,
    ) -> Result<Box<dyn Instance>, ProviderError> {
        self.shared.record(format!("run_scanning_job({region}, {snapshot_id})"));
        if let Some(err) = self.shared.take_failure(FailurePoint::RunScanningJob) {
            return Err(err);
        }
        wait_or_cancel(ctx, self.shared.delay_for(FailurePoint::RunScanningJob)).await?;
        let id = InstanceId::from(self.shared.next_id("i"));
        Ok(Box::new(FakeInstance {
            id,
            region: region.to_string(),
            availability_zone: "fake-az-1".to_string(),
            shared: self.shared.clone(),
        }))
    }
}

#[derive(Clone)]
pub struct FakeInstance {
    id: InstanceId,
    region: String,
    availability_zone: String,
    shared: Arc<Shared>,
}

#[async_trait]
impl Instance for FakeInstance {
    fn id(&self) -> &InstanceId {
        &self.id
    }

    fn region(&self) -> &str {
        &self.region
    }

    fn availability_zone(&self) -> &str {
        &self.availability_zone
    }

    async fn get_root_volume(&self, ctx: &ScanContext) -> Result<Box<dyn Volume>, ProviderError> {
        self.shared.record(format!("get_root_volume({})", self.id));
        if let Some(err) = self.shared.take_failure(FailurePoint::GetRootVolume) {
            return Err(err);
        }
        wait_or_cancel(ctx, self.shared.delay_for(FailurePoint::GetRootVolume)).await?;
        let id = VolumeId::from(self.shared.next_id("v"));
        Ok(Box::new(FakeVolume { id, region: self.region.clone(), shared: self.shared.clone() }))
    }

    async fn wait_for_ready(&self, ctx: &ScanContext) -> Result<(), ProviderError> {
        self.shared.record(format!("instance_wait_for_ready({})", self.id));
        if let Some(err) = self.shared.take_failure(FailurePoint::InstanceWaitForReady) {
            return Err(err);
        }
        wait_or_cancel(ctx, self.shared.delay_for(FailurePoint::InstanceWaitForReady)).await
    }

    async fn attach_volume(
        &self,
        ctx: &ScanContext,
        volume: &dyn Volume,
        device_name: &str,
    ) -> Result<(), ProviderError> {
        self.shared.record(format!("attach_volume({}, {}, {device_name})", self.id, volume.id()));
        if let Some(err) = self.shared.take_failure(FailurePoint::AttachVolume) {
            return Err(err);
        }
        wait_or_cancel(ctx, self.shared.delay_for(FailurePoint::AttachVolume)).await
    }

    async fn delete(&self, ctx: &ScanContext) -> Result<(), ProviderError> {
        self.shared.record(format!("delete_instance({})", self.id));
        let mut state = self.shared.state.lock();
        if !state.deleted_instances.insert(self.id.clone()) {
            return Ok(());
        }
        drop(state);
        let _ = ctx;
        Ok(())
    }
}

#[derive(Clone)]
pub struct FakeVolume {
    id: VolumeId,
    region: String,
    shared: Arc<Shared>,
}

#[async_trait]
impl Volume for FakeVolume {
    fn id(&self) -> &VolumeId {
        &self.id
    }

    async fn take_snapshot(&self, ctx: &ScanContext) -> Result<Box<dyn Snapshot>, ProviderError> {
        self.shared.record(format!("take_snapshot({})", self.id));
        if let Some(err) = self.shared.take_failure(FailurePoint::TakeSnapshot) {
            return Err(err);
        }
        wait_or_cancel(ctx, self.shared.delay_for(FailurePoint::TakeSnapshot)).await?;
        let id = SnapshotId::from(self.shared.next_id("snap"));
        Ok(Box::new(FakeSnapshot { id, region: self.region.clone(), shared: self.shared.clone() }))
    }

    async fn wait_for_attached(&self, ctx: &ScanContext) -> Result<(), ProviderError> {
        self.shared.record(format!("wait_for_attached({})", self.id));
        if let Some(err) = self.shared.take_failure(FailurePoint::VolumeWaitForAttached) {
            return Err(err);
        }
        wait_or_cancel(ctx, self.shared.delay_for(FailurePoint::VolumeWaitForAttached)).await
    }

    async fn delete(&self, ctx: &ScanContext) -> Result<(), ProviderError> {
        self.shared.record(format!("delete_volume({})", self.id));
        let mut state = self.shared.state.lock();
        if !state.deleted_volumes.insert(self.id.clone()) {
            return Ok(());
        }
        drop(state);
        let _ = ctx;
        Ok(())
    }
}

#[derive(Clone)]
pub struct FakeSnapshot {
    id: SnapshotId,
    region: String,
    shared: Arc<Shared>,
}

#[async_trait]
impl Snapshot for FakeSnapshot {
    fn id(&self) -> &SnapshotId {
        &self.id
    }

    fn region(&self) -> &str {
        &self.region
    }

    async fn wait_for_ready(&self, ctx: &ScanContext, timeout: Duration) -> Result<(), ProviderError> {
        self.shared.record(format!("snapshot_wait_for_ready({})", self.id));
        if let Some(err) = self.shared.take_failure(FailurePoint::SnapshotWaitForReady) {
            return Err(err);
        }
        let delay = self.shared.delay_for(FailurePoint::SnapshotWaitForReady);
        if delay > timeout {
            tokio::select! {
                _ = tokio::time::sleep(timeout) => {
                    return Err(ProviderError::ReadinessTimeout {
                        resource: "snapshot",
                        id: self.id.to_string(),
                        timeout_secs: timeout.as_secs(),
                    });
                }
                _ = ctx.cancelled() => return Err(ProviderError::Cancelled),
            }
        }
        wait_or_cancel(ctx, delay).await
    }

    async fn copy(&self, ctx: &ScanContext, region: &str) -> Result<Box<dyn Snapshot>, ProviderError> {
        self.shared.record(format!("copy_snapshot({}, {region})", self.id));
        if let Some(err) = self.shared.take_failure(FailurePoint::SnapshotCopy) {
            return Err(err);
        }
        wait_or_cancel(ctx, self.shared.delay_for(FailurePoint::SnapshotCopy)).await?;
        let id = SnapshotId::from(self.shared.next_id("snap"));
        Ok(Box::new(FakeSnapshot { id, region: region.to_string(), shared: self.shared.clone() }))
    }

    async fn create_volume(
        &self,
        ctx: &ScanContext,
        availability_zone: &str,
    ) -> Result<Box<dyn Volume>, ProviderError> {
        self.shared.record(format!("create_volume({}, {availability_zone})", self.id));
        if let Some(err) = self.shared.take_failure(FailurePoint::SnapshotCreateVolume) {
            return Err(err);
        }
        wait_or_cancel(ctx, self.shared.delay_for(FailurePoint::SnapshotCreateVolume)).await?;
        let id = VolumeId::from(self.shared.next_id("v"));
        Ok(Box::new(FakeVolume { id, region: self.region.clone(), shared: self.shared.clone() }))
    }

    async fn delete(&self, ctx: &ScanContext) -> Result<(), ProviderError> {
        self.shared.record(format!("delete_snapshot({})", self.id));
        let mut state = self.shared.state.lock();
        if !state.deleted_snapshots.insert(self.id.clone()) {
            return Ok(());
        }
        drop(state);
        let _ = ctx;
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
