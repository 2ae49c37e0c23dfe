// file: src/spec/builder.rs
// version: 1.0.0
// guid: a3b87f60-92cd-4e51-b8a4-7d105e36c2f9

//! VM specification builder
//!
//! Turns a VM identity, sizing, and initialization payload into one complete
//! declarative resource specification. Building is pure: validation failures
//! surface here, before anything is handed to the orchestration engine.

use super::vm::{
    AgentSpec, CdromSpec, CpuSpec, DiskSpec, InitializationSpec, MacAddress, MemorySpec,
    NetworkBootstrap, NetworkDeviceSpec, TemplateVar, UserAccount, VmSpec,
};
use crate::{DeployError, Result};
use std::collections::BTreeMap;

/// Immutable identity of one deployed VM
#[derive(Debug, Clone)]
pub struct VmIdentity {
    pub name: String,
    pub vm_id: u32,
    pub role: String,
}

impl VmIdentity {
    pub fn new(name: impl Into<String>, vm_id: u32, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vm_id,
            role: role.into(),
        }
    }
}

/// Options for the single boot/data disk
#[derive(Debug, Clone)]
pub struct DiskOptions {
    /// Whole-gigabyte size
    pub size_gb: u32,
    pub use_solid_state: bool,
    /// Optional async I/O engine (e.g. `io_uring` for media workloads)
    pub io_engine: Option<String>,
}

/// First-boot initialization payload, consumed exactly once at creation
#[derive(Debug, Clone)]
pub struct InitPayload {
    pub network: NetworkBootstrap,
    pub account: UserAccount,
    /// Cloud-init template resource id applied as user data
    pub user_data_file_id: String,
    /// Template substitution variables (secrets and plain strings)
    pub replace_vars: BTreeMap<String, TemplateVar>,
}

const BOOT_ORDER_DISK_FIRST: &str = "scsi0;net0;ide2;ide0;ide1";
const BOOT_ORDER_MEDIA_FIRST: &str = "ide2;scsi0;net0;ide0;ide1";

/// Builder for one VM resource specification
pub struct VmSpecBuilder {
    identity: VmIdentity,
    node_name: String,
    storage_pool: String,
    bridge: String,
    description: String,
    tags: String,
    cores: u32,
    memory_mb: u32,
    disk: Option<DiskOptions>,
    mac: Option<MacAddress>,
    vlan_id: Option<u16>,
    init: Option<InitPayload>,
    boot_media: Option<String>,
    startup_order: u32,
}

impl VmSpecBuilder {
    /// Start a specification for the given identity on the given host node
    pub fn new(identity: VmIdentity, node_name: impl Into<String>) -> Self {
        Self {
            identity,
            node_name: node_name.into(),
            storage_pool: "local-zfs".to_string(),
            bridge: "vmbr0".to_string(),
            description: String::new(),
            tags: String::new(),
            cores: 0,
            memory_mb: 0,
            disk: None,
            mac: None,
            vlan_id: None,
            init: None,
            boot_media: None,
            startup_order: 1,
        }
    }

    pub fn storage_pool(mut self, pool: impl Into<String>) -> Self {
        self.storage_pool = pool.into();
        self
    }

    pub fn bridge(mut self, bridge: impl Into<String>) -> Self {
        self.bridge = bridge.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    pub fn cores(mut self, cores: u32) -> Self {
        self.cores = cores;
        self
    }

    pub fn memory_mb(mut self, memory_mb: u32) -> Self {
        self.memory_mb = memory_mb;
        self
    }

    pub fn disk(mut self, disk: DiskOptions) -> Self {
        self.disk = Some(disk);
        self
    }

    pub fn mac(mut self, mac: MacAddress) -> Self {
        self.mac = Some(mac);
        self
    }

    pub fn vlan(mut self, vlan_id: Option<u16>) -> Self {
        self.vlan_id = vlan_id;
        self
    }

    pub fn init(mut self, payload: InitPayload) -> Self {
        self.init = Some(payload);
        self
    }

    /// Attach an installation image; absent means boot from the primary disk
    pub fn boot_media(mut self, iso: Option<String>) -> Self {
        self.boot_media = iso;
        self
    }

    pub fn startup_order(mut self, order: u32) -> Self {
        self.startup_order = order;
        self
    }

    /// Build the final specification, validating sizing and credentials
    pub fn build(self) -> Result<VmSpec> {
        let name = self.identity.name.clone();

        if self.cores == 0 {
            return Err(DeployError::validation(format!(
                "VM {} must have at least 1 CPU core",
                name
            )));
        }
        if self.memory_mb == 0 {
            return Err(DeployError::validation(format!(
                "VM {} must have a positive memory allocation",
                name
            )));
        }

        let disk = self
            .disk
            .ok_or_else(|| DeployError::validation(format!("VM {} has no disk", name)))?;
        if disk.size_gb == 0 {
            return Err(DeployError::validation(format!(
                "VM {} disk size must be a positive whole-gigabyte quantity",
                name
            )));
        }

        let mac = self
            .mac
            .ok_or_else(|| DeployError::validation(format!("VM {} has no MAC address", name)))?;

        let init = self
            .init
            .ok_or_else(|| DeployError::validation(format!("VM {} has no init payload", name)))?;
        init.account.validate()?;

        let cdrom = self.boot_media.map(CdromSpec::installer);
        let boot_order = if cdrom.is_some() {
            BOOT_ORDER_MEDIA_FIRST
        } else {
            BOOT_ORDER_DISK_FIRST
        };

        Ok(VmSpec {
            node_name: self.node_name,
            vm_id: self.identity.vm_id,
            name,
            description: self.description,
            cpu: CpuSpec::host(self.cores),
            memory: MemorySpec {
                dedicated: self.memory_mb,
            },
            disk: vec![DiskSpec {
                datastore_id: self.storage_pool.clone(),
                file_format: "qcow2".to_string(),
                size: format!("{}G", disk.size_gb),
                disk_type: "scsi".to_string(),
                interface: "virtio-scsi-pci".to_string(),
                iothread: true,
                discard: "on".to_string(),
                ssd: disk.use_solid_state,
                cache: "writeback".to_string(),
                storage: self.storage_pool.clone(),
                aio: disk.io_engine,
            }],
            cdrom,
            network_device: vec![NetworkDeviceSpec {
                model: "virtio".to_string(),
                bridge: self.bridge,
                mac_address: mac,
                firewall: true,
                vlan_id: self.vlan_id,
            }],
            os_type: "cloud-init".to_string(),
            scsihw: "virtio-scsi-pci".to_string(),
            boot_disk: self.storage_pool,
            boot_order: boot_order.to_string(),
            agent: AgentSpec::default(),
            initialization: InitializationSpec {
                ip_config0: init.network.render(),
                user_account: init.account,
                user_data_file_id: init.user_data_file_id,
                user_data_replace_var: init.replace_vars,
            },
            tags: self.tags,
            on_boot: true,
            startup_order: self.startup_order,
            hotplug: "network,disk,usb,memory".to_string(),
            vga: "std".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> InitPayload {
        InitPayload {
            network: NetworkBootstrap::Dhcp,
            account: UserAccount {
                username: "ubuntu".to_string(),
                uid: 1000,
                password: None,
                keys: vec!["ssh-ed25519 AAAA...".to_string()],
            },
            user_data_file_id: "gw-cloud-init".to_string(),
            replace_vars: BTreeMap::new(),
        }
    }

    fn builder() -> VmSpecBuilder {
        VmSpecBuilder::new(VmIdentity::new("gw-01", 100, "gw"), "r240")
            .cores(2)
            .memory_mb(4096)
            .disk(DiskOptions {
                size_gb: 80,
                use_solid_state: true,
                io_engine: None,
            })
            .mac(MacAddress::for_role_index(1))
            .init(payload())
    }

    #[test]
    fn test_build_emits_one_disk_and_one_nic() {
        let spec = builder().build().unwrap();
        assert_eq!(spec.disk.len(), 1);
        assert_eq!(spec.network_device.len(), 1);
        assert_eq!(spec.cpu.cores, 2);
        assert_eq!(spec.cpu.cpu_type, "host");
        assert_eq!(spec.cpu.sockets, 1);
        assert_eq!(spec.memory.dedicated, 4096);
        assert!(spec.agent.enabled);
        assert!(spec.on_boot);
    }

    #[test]
    fn test_disk_size_renders_as_whole_gigabytes() {
        let spec = builder().build().unwrap();
        assert_eq!(spec.disk[0].size, "80G");
        assert_eq!(spec.disk[0].file_format, "qcow2");
        assert_eq!(spec.disk[0].cache, "writeback");
    }

    #[test]
    fn test_no_boot_media_means_no_cdrom_and_disk_first_boot() {
        let spec = builder().build().unwrap();
        assert!(spec.cdrom.is_none());
        assert_eq!(spec.boot_order, "scsi0;net0;ide2;ide0;ide1");
    }

    #[test]
    fn test_boot_media_emits_cdrom_with_boot_flag() {
        let spec = builder()
            .boot_media(Some("local:iso/olares-1.0.0.iso".to_string()))
            .build()
            .unwrap();
        let cdrom = spec.cdrom.unwrap();
        assert!(cdrom.boot);
        assert_eq!(cdrom.iso, "local:iso/olares-1.0.0.iso");
        assert_eq!(spec.boot_order, "ide2;scsi0;net0;ide0;ide1");
    }

    #[test]
    fn test_zero_cores_rejected() {
        let result = builder().cores(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_credential_rejected() {
        let mut p = payload();
        p.account.keys.clear();
        let result = builder().init(p).build();
        assert!(result.is_err());
    }
}
