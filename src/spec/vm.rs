// file: src/spec/vm.rs
// version: 1.0.0
// guid: 4c19e7d2-6a85-4b03-97f6-d2481c50ab36

//! VM resource specification value types
//!
//! These structs mirror the provider's resource schema (camelCase field
//! names) and are immutable once built. Serialization order is fixed so that
//! repeated builds of the same stack produce byte-identical documents.

use crate::config::Secret;
use crate::{DeployError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A 6-byte hardware address, deterministic per role with override capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Locally-administered QEMU prefix used for the deterministic plan
    const ROLE_PREFIX: [u8; 5] = [0x52, 0x54, 0x00, 0x10, 0x00];

    /// Build from raw octets
    pub fn from_octets(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Deterministic address for the nth VM role (1-based)
    pub fn for_role_index(index: u8) -> Self {
        let p = Self::ROLE_PREFIX;
        Self([p[0], p[1], p[2], p[3], p[4], index])
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}

impl FromStr for MacAddress {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 6 {
            return Err(DeployError::validation(format!(
                "MAC address must have 6 octets: {}",
                s
            )));
        }
        let mut octets = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            octets[i] = u8::from_str_radix(part, 16).map_err(|_| {
                DeployError::validation(format!("Invalid MAC address octet {} in {}", part, s))
            })?;
        }
        Ok(Self(octets))
    }
}

impl Serialize for MacAddress {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Compute block: host-passthrough CPU, single socket, fixed feature flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuSpec {
    pub cores: u32,
    #[serde(rename = "type")]
    pub cpu_type: String,
    pub sockets: u32,
    pub flags: String,
}

impl CpuSpec {
    /// Host-passthrough CPU with the deployment's fixed flag set
    pub fn host(cores: u32) -> Self {
        Self {
            cores,
            cpu_type: "host".to_string(),
            sockets: 1,
            flags: "pcid,pcie,hypervisor".to_string(),
        }
    }
}

/// Memory block, dedicated allocation in MB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorySpec {
    pub dedicated: u32,
}

/// Primary disk block: qcow2 on virtio-scsi with iothread, trim, write-back
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskSpec {
    pub datastore_id: String,
    pub file_format: String,
    /// Whole-gigabyte size rendered in the provider's `<n>G` form
    pub size: String,
    #[serde(rename = "type")]
    pub disk_type: String,
    pub interface: String,
    pub iothread: bool,
    pub discard: String,
    pub ssd: bool,
    pub cache: String,
    pub storage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aio: Option<String>,
}

/// Virtual NIC block: virtio model on the shared bridge, firewall on
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDeviceSpec {
    pub model: String,
    pub bridge: String,
    pub mac_address: MacAddress,
    pub firewall: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u16>,
}

/// Guest agent integration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSpec {
    pub enabled: bool,
    pub trim_cloned_disks: bool,
    pub hotplug: String,
}

impl Default for AgentSpec {
    fn default() -> Self {
        Self {
            enabled: true,
            trim_cloned_disks: true,
            hotplug: "network-disks".to_string(),
        }
    }
}

/// Removable boot media attached only when an installation image is configured
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdromSpec {
    pub ide: String,
    pub iso: String,
    pub storage: String,
    pub interface: String,
    pub boot: bool,
}

impl CdromSpec {
    /// Attach an installation image on ide2 as the boot device
    pub fn installer(iso: impl Into<String>) -> Self {
        Self {
            ide: "ide2".to_string(),
            iso: iso.into(),
            storage: "local".to_string(),
            interface: "ide".to_string(),
            boot: true,
        }
    }
}

/// First-boot network bootstrap mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkBootstrap {
    Dhcp,
    Static { address: String, gateway: String },
}

impl NetworkBootstrap {
    /// Render in the provider's `ipConfig0` form
    pub fn render(&self) -> String {
        match self {
            NetworkBootstrap::Dhcp => "ip=dhcp".to_string(),
            NetworkBootstrap::Static { address, gateway } => {
                format!("ip={},gw={}", address, gateway)
            }
        }
    }
}

/// First-boot user account
#[derive(Debug, Clone, Serialize)]
pub struct UserAccount {
    pub username: String,
    pub uid: u32,
    /// Operator-supplied crypt hash; never defaulted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub keys: Vec<String>,
}

impl UserAccount {
    /// Validate the account carries a usable credential
    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(DeployError::validation(
                "User account username cannot be empty".to_string(),
            ));
        }
        if self.password.is_none() && self.keys.is_empty() {
            return Err(DeployError::validation(format!(
                "User account {} needs an SSH public key or an explicit password hash",
                self.username
            )));
        }
        Ok(())
    }
}

/// Cloud-init template substitution variable, plain or secret-typed
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TemplateVar {
    Plain(String),
    Secret(Secret),
}

/// Cloud-init initialization payload, consumed exactly once at VM creation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializationSpec {
    pub ip_config0: String,
    pub user_account: UserAccount,
    pub user_data_file_id: String,
    pub user_data_replace_var: BTreeMap<String, TemplateVar>,
}

/// One complete declarative VM resource specification
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VmSpec {
    pub node_name: String,
    pub vm_id: u32,
    pub name: String,
    pub description: String,
    pub cpu: CpuSpec,
    pub memory: MemorySpec,
    pub disk: Vec<DiskSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cdrom: Option<CdromSpec>,
    pub network_device: Vec<NetworkDeviceSpec>,
    pub os_type: String,
    pub scsihw: String,
    pub boot_disk: String,
    pub boot_order: String,
    pub agent: AgentSpec,
    pub initialization: InitializationSpec,
    pub tags: String,
    pub on_boot: bool,
    pub startup_order: u32,
    pub hotplug: String,
    pub vga: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mac_roundtrip() {
        let mac = MacAddress::from_str("52:54:00:10:00:03").unwrap();
        assert_eq!(mac.to_string(), "52:54:00:10:00:03");
        assert_eq!(mac, MacAddress::for_role_index(3));
    }

    #[test]
    fn test_mac_rejects_malformed() {
        assert!(MacAddress::from_str("52:54:00:10:00").is_err());
        assert!(MacAddress::from_str("52:54:00:10:00:zz").is_err());
        assert!(MacAddress::from_str("not-a-mac").is_err());
    }

    #[test]
    fn test_network_bootstrap_render() {
        assert_eq!(NetworkBootstrap::Dhcp.render(), "ip=dhcp");
        let fixed = NetworkBootstrap::Static {
            address: "192.168.1.10/24".to_string(),
            gateway: "192.168.1.1".to_string(),
        };
        assert_eq!(fixed.render(), "ip=192.168.1.10/24,gw=192.168.1.1");
    }

    #[test]
    fn test_account_requires_credential() {
        let mut account = UserAccount {
            username: "ubuntu".to_string(),
            uid: 1000,
            password: None,
            keys: vec![],
        };
        assert!(account.validate().is_err());

        account.keys.push("ssh-ed25519 AAAA...".to_string());
        assert!(account.validate().is_ok());

        account.keys.clear();
        account.password = Some("$6$rounds=4096$...".to_string());
        assert!(account.validate().is_ok());
    }

    #[test]
    fn test_secret_template_var_serializes_redacted() {
        let var = TemplateVar::Secret(Secret::new("tskey-auth-xyz"));
        assert_eq!(serde_json::to_string(&var).unwrap(), "\"[secret]\"");

        let plain = TemplateVar::Plain("rns.lol".to_string());
        assert_eq!(serde_json::to_string(&plain).unwrap(), "\"rns.lol\"");
    }
}
