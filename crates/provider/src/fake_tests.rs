// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::ScanContext;

fn job_config() -> ScannerJobConfig {
    ScannerJobConfig {
        scanner_image: "scanner:latest".into(),
        instance_type: "m5.large".into(),
        key_pair_name: "kp".into(),
        backend_address: "https://backend.internal".into(),
        family_config_yaml: "families: {}".into(),
        tags: BTreeMap::new(),
    }
}

#[tokio::test]
async fn happy_path_walks_the_full_chain() {
    let provider = FakeProvider::new("us-east-1");
    let ctx = ScanContext::new();
    let target = provider.seed_target_instance("us-east-1", "us-east-1a");

    let root_volume = target.get_root_volume(&ctx).await.unwrap();
    let snapshot = root_volume.take_snapshot(&ctx).await.unwrap();
    snapshot.wait_for_ready(&ctx, Duration::from_secs(5)).await.unwrap();

    let worker = provider
        .run_scanning_job(&ctx, "us-east-1", snapshot.id(), &job_config())
        .await
        .unwrap();
    worker.wait_for_ready(&ctx).await.unwrap();

    let scan_volume = snapshot.create_volume(&ctx, worker.availability_zone()).await.unwrap();
    worker.attach_volume(&ctx, scan_volume.as_ref(), "/dev/sdf").await.unwrap();
    scan_volume.wait_for_attached(&ctx).await.unwrap();

    assert!(provider.calls().iter().any(|c| c.starts_with("run_scanning_job")));
}

#[tokio::test]
async fn cross_region_copy_produces_snapshot_tagged_with_new_region() {
    let provider = FakeProvider::new("us-east-1");
    let ctx = ScanContext::new();
    let target = provider.seed_target_instance("us-east-1", "us-east-1a");
    let volume = target.get_root_volume(&ctx).await.unwrap();
    let snapshot = volume.take_snapshot(&ctx).await.unwrap();

    let copy = snapshot.copy(&ctx, "eu-west-1").await.unwrap();
    assert_eq!(copy.region(), "eu-west-1");
    assert_ne!(copy.id(), snapshot.id());
}

#[tokio::test]
async fn injected_failure_surfaces_to_caller() {
    let provider = FakeProvider::new("us-east-1");
    provider.inject_failure(FailurePoint::AttachVolume, ProviderError::Api("boom".into()));
    let ctx = ScanContext::new();
    let target = provider.seed_target_instance("us-east-1", "us-east-1a");
    let volume = target.get_root_volume(&ctx).await.unwrap();

    let err = target.attach_volume(&ctx, volume.as_ref(), "/dev/sdf").await.unwrap_err();
    assert!(matches!(err, ProviderError::Api(_)));
}

#[tokio::test(start_paused = true)]
async fn cancellation_wins_a_race_against_a_slow_call() {
    let provider = FakeProvider::new("us-east-1");
    provider.inject_delay(FailurePoint::InstanceWaitForReady, Duration::from_secs(30));
    let ctx = ScanContext::new();
    let target = provider.seed_target_instance("us-east-1", "us-east-1a");

    let waiter = ctx.clone();
    let target2 = target.clone();
    let handle = tokio::spawn(async move { target2.wait_for_ready(&waiter).await });
    ctx.cancel();
    let result = handle.await.unwrap();
    assert!(matches!(result, Err(ProviderError::Cancelled)));
}

#[tokio::test(start_paused = true)]
async fn snapshot_wait_for_ready_times_out_independently_of_cancellation() {
    let provider = FakeProvider::new("us-east-1");
    provider.inject_delay(FailurePoint::SnapshotWaitForReady, Duration::from_secs(600));
    let ctx = ScanContext::new();
    let target = provider.seed_target_instance("us-east-1", "us-east-1a");
    let volume = target.get_root_volume(&ctx).await.unwrap();
    let snapshot = volume.take_snapshot(&ctx).await.unwrap();

    let err = snapshot.wait_for_ready(&ctx, Duration::from_secs(5)).await.unwrap_err();
    assert!(matches!(err, ProviderError::ReadinessTimeout { .. }));
}

#[tokio::test]
async fn deleting_an_instance_twice_is_a_no_op_the_second_time() {
    let provider = FakeProvider::new("us-east-1");
    let ctx = ScanContext::new();
    let target = provider.seed_target_instance("us-east-1", "us-east-1a");

    target.delete(&ctx).await.unwrap();
    target.delete(&ctx).await.unwrap();
    assert!(provider.is_instance_deleted(target.id()));
    assert_eq!(provider.calls().iter().filter(|c| c.starts_with("delete_instance")).count(), 2);
}
