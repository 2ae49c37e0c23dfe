// file: src/config/overrides.rs
// version: 1.0.0
// guid: 8e60c2b7-15d4-4f39-ae87-03b9f5d1c842

//! Typed per-VM configuration overrides
//!
//! The stack file may carry `mac:<vm>`, `vlan:<vm>`, and `iso:<vm>` keys in
//! the top-level bucket. They are parsed once into a typed table, validated
//! against the known VM set at load time rather than looked up ad hoc per
//! field.

use super::resolver::ConfigResolver;
use crate::spec::MacAddress;
use crate::{DeployError, Result};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Overrides for a single VM
#[derive(Debug, Clone, Default)]
pub struct VmOverrides {
    /// Replace the deterministic per-role MAC address
    pub mac: Option<MacAddress>,
    /// Tag the VM's NIC with a VLAN id (1..=4094)
    pub vlan_id: Option<u16>,
    /// Attach an installation image as removable boot media
    pub boot_iso: Option<String>,
}

/// Override records for every VM in the deployment, keyed by VM role name
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    entries: BTreeMap<String, VmOverrides>,
}

impl OverrideTable {
    /// Parse and validate all override keys against the known VM set
    pub fn parse(resolver: &ConfigResolver, known_vms: &[&str]) -> Result<Self> {
        let mut table = Self::default();

        for key in collect_keys(resolver, "mac:") {
            let name = validate_vm_name(&key, "mac:", known_vms)?;
            let raw = resolver.require("", &key)?;
            let mac = MacAddress::from_str(raw)
                .map_err(|e| DeployError::config(format!("Invalid {}: {}", key, e)))?;
            table.entry_mut(&name).mac = Some(mac);
        }

        for key in collect_keys(resolver, "vlan:") {
            let name = validate_vm_name(&key, "vlan:", known_vms)?;
            let vlan = resolver.require_number("", &key)?;
            if !(1..=4094).contains(&vlan) {
                return Err(DeployError::config(format!(
                    "Invalid {}: VLAN id {} out of range 1..=4094",
                    key, vlan
                )));
            }
            table.entry_mut(&name).vlan_id = Some(vlan as u16);
        }

        for key in collect_keys(resolver, "iso:") {
            let name = validate_vm_name(&key, "iso:", known_vms)?;
            let iso = resolver.require("", &key)?;
            table.entry_mut(&name).boot_iso = Some(iso.to_string());
        }

        Ok(table)
    }

    /// Overrides for one VM; VMs without override keys get the empty record
    pub fn for_vm(&self, name: &str) -> VmOverrides {
        self.entries.get(name).cloned().unwrap_or_default()
    }

    fn entry_mut(&mut self, name: &str) -> &mut VmOverrides {
        self.entries.entry(name.to_string()).or_default()
    }
}

fn collect_keys(resolver: &ConfigResolver, prefix: &str) -> Vec<String> {
    resolver
        .keys_with_prefix(prefix)
        .map(str::to_string)
        .collect()
}

fn validate_vm_name(key: &str, prefix: &str, known_vms: &[&str]) -> Result<String> {
    let name = &key[prefix.len()..];
    if !known_vms.contains(&name) {
        return Err(DeployError::config(format!(
            "Override key {} names unknown VM {} (known: {})",
            key,
            name,
            known_vms.join(", ")
        )));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN: &[&str] = &["gw", "olares", "cosmos", "ynh"];

    #[test]
    fn test_parse_overrides() {
        let stack = r#"
config:
  mac:cosmos: 52:54:00:aa:bb:cc
  vlan:gw: 10
  iso:olares: local:iso/olares-1.0.0.iso
"#;
        let resolver = ConfigResolver::from_yaml_str(stack).unwrap();
        let table = OverrideTable::parse(&resolver, KNOWN).unwrap();

        let cosmos = table.for_vm("cosmos");
        assert_eq!(cosmos.mac.unwrap().to_string(), "52:54:00:aa:bb:cc");

        assert_eq!(table.for_vm("gw").vlan_id, Some(10));
        assert_eq!(
            table.for_vm("olares").boot_iso.as_deref(),
            Some("local:iso/olares-1.0.0.iso")
        );
        assert!(table.for_vm("ynh").mac.is_none());
    }

    #[test]
    fn test_unknown_vm_rejected_at_load() {
        let stack = "config:\n  mac:router: 52:54:00:aa:bb:cc\n";
        let resolver = ConfigResolver::from_yaml_str(stack).unwrap();
        let err = OverrideTable::parse(&resolver, KNOWN).unwrap_err();
        assert!(err.to_string().contains("unknown VM router"));
    }

    #[test]
    fn test_malformed_mac_rejected_at_load() {
        let stack = "config:\n  mac:gw: not-a-mac\n";
        let resolver = ConfigResolver::from_yaml_str(stack).unwrap();
        assert!(OverrideTable::parse(&resolver, KNOWN).is_err());
    }

    #[test]
    fn test_vlan_range_checked() {
        let stack = "config:\n  vlan:gw: 5000\n";
        let resolver = ConfigResolver::from_yaml_str(stack).unwrap();
        let err = OverrideTable::parse(&resolver, KNOWN).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
