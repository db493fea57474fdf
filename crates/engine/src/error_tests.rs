// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vmscan_core::FailureKind;

#[test]
fn provider_error_classification_passes_through() {
    let err = PipelineError::from(ProviderError::Cancelled);
    assert!(matches!(err.classify(), FailureKind::Cancelled));
}

#[test]
fn store_error_classification_passes_through() {
    let err = PipelineError::from(StoreError::Request("x".into()));
    assert!(matches!(err.classify(), FailureKind::Store));
}

#[test]
fn unexpected_classifies_as_unexpected() {
    let err = PipelineError::Unexpected("boom".into());
    assert!(matches!(err.classify(), FailureKind::Unexpected));
}
