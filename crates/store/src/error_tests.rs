// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vmscan_core::FailureKind;

#[test]
fn every_variant_classifies_as_store() {
    let errs = [
        StoreError::NotFound { resource: "scan", id: "scn-1".into() },
        StoreError::Request("timeout".into()),
        StoreError::Decode("bad json".into()),
    ];
    for err in errs {
        assert!(matches!(err.classify(), FailureKind::Store));
    }
}
