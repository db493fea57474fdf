// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier types for the scan domain.

crate::define_id! {
    /// Unique identifier for a scan.
    pub struct ScanId("scn-");
}

crate::define_id! {
    /// Unique identifier for a scannable target (a VM instance).
    pub struct TargetId("tgt-");
}

crate::define_id! {
    /// Unique identifier for a per-(scan, target) result record.
    pub struct TargetScanResultId("tsr-");
}

/// Opaque identifier assigned by the cloud provider to a resource.
///
/// Unlike [`ScanId`]/[`TargetId`]/[`TargetScanResultId`], these are never
/// generated locally — they are handed back by the provider on create and
/// only ever round-tripped.
macro_rules! define_provider_id {
    ($(#[$meta:meta])* pub struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

define_provider_id! {
    /// Provider-assigned identifier for a launched scanner instance (or target instance).
    pub struct InstanceId;
}

define_provider_id! {
    /// Provider-assigned identifier for a storage volume.
    pub struct VolumeId;
}

define_provider_id! {
    /// Provider-assigned identifier for a point-in-time snapshot.
    pub struct SnapshotId;
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
