// file: src/config/mod.rs
// version: 1.0.0
// guid: 5b2e8f41-a7c0-4d96-9e13-6f84d20cb573

//! Configuration module for the homelab deployment builder
//!
//! Handles per-stack configuration resolution, secret handling, typed per-VM
//! overrides, and the deployment security posture.

pub mod overrides;
pub mod resolver;
pub mod secret;

pub use overrides::{OverrideTable, VmOverrides};
pub use resolver::ConfigResolver;
pub use secret::Secret;

use serde::{Deserialize, Serialize};

/// Security posture selected per deployment.
///
/// Exactly one posture applies to a build; it controls the default for the
/// `proxmox:insecure` TLS flag. Required configuration (credentials, sizing,
/// VPN auth key) is posture-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityPosture {
    /// Unset `proxmox:insecure` defaults to accepting unverified TLS
    #[serde(rename = "permissive")]
    Permissive,
    /// Unset `proxmox:insecure` defaults to rejecting unverified TLS
    #[serde(rename = "strict")]
    Strict,
}

impl SecurityPosture {
    /// Get the posture as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityPosture::Permissive => "permissive",
            SecurityPosture::Strict => "strict",
        }
    }

    /// Default for the `proxmox:insecure` flag when the key is unset
    pub fn insecure_default(&self) -> bool {
        matches!(self, SecurityPosture::Permissive)
    }
}

impl std::str::FromStr for SecurityPosture {
    type Err = crate::error::DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "permissive" => Ok(SecurityPosture::Permissive),
            "strict" => Ok(SecurityPosture::Strict),
            _ => Err(crate::error::DeployError::config(format!(
                "Unknown security posture: {} (expected permissive or strict)",
                s
            ))),
        }
    }
}
