// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vmscan_core::{InstanceId, TargetId};

#[test]
fn scan_data_carries_target_and_result_id() {
    let target = Target::new(TargetId::new(), "us-east-1", InstanceId::new("i-1"), "us-east-1a");
    let result_id = TargetScanResultId::new();
    let data = ScanData { target: target.clone(), result_id: result_id.clone() };
    assert_eq!(data.target.id, target.id);
    assert_eq!(data.result_id, result_id);
}
