// file: src/deploy/summary.rs
// version: 1.0.0
// guid: d0f92c65-31b8-4a07-9e54-68b1c3e7a820

//! Aggregate exports derived from the built deployment
//!
//! Pure functions of the four VMs' sizing parameters; computed once after all
//! VMs are built and consumed by downstream automation and dashboards.

use crate::config::Secret;
use crate::spec::VmSpec;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-VM sizing as resolved from configuration
#[derive(Debug, Clone, Copy)]
pub struct VmSizing {
    pub cpu_cores: u32,
    pub memory_mb: u32,
    pub disk_gb: u32,
}

/// Exported values for downstream automation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exports {
    pub vm_ids: BTreeMap<String, u32>,
    pub vm_names: BTreeMap<String, String>,
    /// VPN-mesh auth key; always rendered redacted
    pub tailscale_auth_key: Secret,
    pub total_vcpu: u32,
    pub total_memory_gb: u32,
    pub total_storage_gb: u32,
    pub cluster_status: String,
}

impl Exports {
    /// Compute the aggregate exports from the built VM set
    pub fn compute(
        vms: &BTreeMap<String, VmSpec>,
        sizings: &BTreeMap<String, VmSizing>,
        node_name: &str,
        storage_pool: &str,
        tailscale_auth_key: Secret,
    ) -> Self {
        let vm_ids = vms.iter().map(|(k, v)| (k.clone(), v.vm_id)).collect();
        let vm_names = vms
            .iter()
            .map(|(k, v)| (k.clone(), v.name.clone()))
            .collect();

        let total_vcpu = sizings.values().map(|s| s.cpu_cores).sum();
        let total_memory_mb: u32 = sizings.values().map(|s| s.memory_mb).sum();
        let total_storage_gb = sizings.values().map(|s| s.disk_gb).sum();

        Self {
            vm_ids,
            vm_names,
            tailscale_auth_key,
            total_vcpu,
            total_memory_gb: total_memory_mb / 1024,
            total_storage_gb,
            cluster_status: format!(
                "Homelab cluster deployed to node {} on storage pool {}",
                node_name, storage_pool
            ),
        }
    }
}
