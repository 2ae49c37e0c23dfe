// file: src/spec/cloudinit.rs
// version: 1.0.0
// guid: e1d06b84-73f2-4a95-bc08-5a27c4910d6e

//! Cloud-init template resource specifications
//!
//! Template files are opaque assets handed to the orchestration engine; they
//! are referenced by path, never parsed here. One template exists per VM role
//! plus a shared `common` base.

use serde::{Deserialize, Serialize};

/// A cloud-init template resource (snippet uploaded to the host's storage)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudInitTemplateSpec {
    pub name: String,
    pub node_name: String,
    pub storage_pool: String,
    /// Opaque asset path, relative to the deployment's cloud-init directory
    pub template: String,
}

impl CloudInitTemplateSpec {
    /// Template for one VM role
    pub fn for_role(role: &str, node_name: &str, storage_pool: &str, asset_dir: &str) -> Self {
        Self {
            name: format!("{}-cloud-init", role),
            node_name: node_name.to_string(),
            storage_pool: storage_pool.to_string(),
            template: format!("{}/user-data-{}.yaml", asset_dir, role),
        }
    }

    /// Shared base template applied to every VM
    pub fn common(node_name: &str, storage_pool: &str, asset_dir: &str) -> Self {
        Self::for_role("common", node_name, storage_pool, asset_dir)
    }

    /// Resource id used as a VM's `userDataFileId` reference
    pub fn id(&self) -> &str {
        &self.name
    }
}
