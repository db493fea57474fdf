// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_job_is_empty() {
    assert!(Job::new().is_empty());
}

#[tokio::test]
async fn job_with_an_instance_is_not_empty() {
    let provider = vmscan_provider::fake::FakeProvider::new("us-east-1");
    let target = provider.seed_target_instance("us-east-1", "us-east-1a");
    let mut job = Job::new();
    job.instance = Some(Box::new(target));
    assert!(!job.is_empty());
}
