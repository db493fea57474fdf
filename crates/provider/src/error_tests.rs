// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vmscan_core::FailureKind;

#[test]
fn cancelled_classifies_as_cancelled() {
    assert!(matches!(ProviderError::Cancelled.classify(), FailureKind::Cancelled));
}

#[test]
fn readiness_timeout_classifies_as_resource_timeout() {
    let err = ProviderError::ReadinessTimeout { resource: "volume", id: "v-1".into(), timeout_secs: 30 };
    assert!(matches!(err.classify(), FailureKind::ResourceTimeout));
}

#[test]
fn api_and_not_found_classify_as_transient() {
    assert!(matches!(ProviderError::Api("x".into()).classify(), FailureKind::TransientProvider));
    let not_found = ProviderError::NotFound { resource: "instance", id: "i-1".into() };
    assert!(matches!(not_found.classify(), FailureKind::TransientProvider));
}
