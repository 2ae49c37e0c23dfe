// file: src/deploy/homelab.rs
// version: 1.0.0
// guid: b74e0a2c-58f1-4d69-8e03-c6a92b1f47d5

//! The fixed four-VM homelab deployment
//!
//! One gateway, one orchestration node, one application/media host, and one
//! self-hosted-services host, all built against a shared resolver and
//! defaulting strategy. Building is fail-fast: every required configuration
//! value is resolved and validated before any specification is emitted.

use super::summary::{Exports, VmSizing};
use crate::config::{ConfigResolver, OverrideTable, Secret};
use crate::spec::{
    CloudInitTemplateSpec, DiskOptions, FirewallSpec, InitPayload, MacAddress, NetworkBootstrap,
    ProviderSpec, TemplateVar, UserAccount, VmIdentity, VmSpec, VmSpecBuilder,
};
use crate::{DeployError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Role keys of the four VMs, in startup order
pub const VM_ROLES: [&str; 4] = ["gw", "olares", "cosmos", "ynh"];

/// Static definition of one VM role
struct RoleDef {
    key: &'static str,
    name: &'static str,
    vm_id: u32,
    startup_order: u32,
    mac_index: u8,
    description: &'static str,
    tags: &'static str,
    use_solid_state: bool,
    io_engine: Option<&'static str>,
}

/// The deployment's identity table. VM ids, names, and the deterministic MAC
/// plan are fixed; only sizing and overrides come from configuration.
const ROLES: [RoleDef; 4] = [
    RoleDef {
        key: "gw",
        name: "gw-01",
        vm_id: 100,
        startup_order: 1,
        mac_index: 1,
        description: "Gateway VM - Networking, Cloudflared tunnels, Service discovery, Homepage dashboard",
        tags: "homelab,gateway,networking,cloudflared",
        use_solid_state: true,
        io_engine: None,
    },
    RoleDef {
        key: "olares",
        name: "olares-01",
        vm_id: 101,
        startup_order: 2,
        mac_index: 2,
        description: "Olares VM - Single-node k3s cluster, Kustomize GitOps, Prometheus monitoring",
        tags: "homelab,olares,kubernetes,k3s,gitops,monitoring",
        use_solid_state: true,
        io_engine: None,
    },
    RoleDef {
        key: "cosmos",
        name: "cosmos-01",
        vm_id: 102,
        startup_order: 3,
        mac_index: 3,
        description: "Cosmos VM - CasaOS app store, Podman containers, Media server, Glance dashboard",
        tags: "homelab,cosmos,applications,media,casaos,podman",
        // Media storage can live on spinning disks; io_uring suits that workload
        use_solid_state: false,
        io_engine: Some("io_uring"),
    },
    RoleDef {
        key: "ynh",
        name: "ynh-01",
        vm_id: 103,
        startup_order: 4,
        mac_index: 4,
        description: "YunoHost VM - Self-hosted services platform, Nextcloud, SSO, Web applications",
        tags: "homelab,yunohost,selfhosted,nextcloud,sso,mail",
        use_solid_state: true,
        io_engine: None,
    },
];

/// The complete deployment document handed to the orchestration engine
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub provider: ProviderSpec,
    pub cloud_init_templates: Vec<CloudInitTemplateSpec>,
    pub vms: BTreeMap<String, VmSpec>,
    pub firewall: FirewallSpec,
    pub exports: Exports,
}

/// Build the full deployment from resolved stack configuration.
///
/// Fails before emitting anything if required configuration is missing, a
/// sizing value is malformed, MAC or VM-id uniqueness is violated, or the
/// firewall ruleset loses its terminal DROP.
pub fn build_deployment(resolver: &ConfigResolver) -> Result<Deployment> {
    let provider = ProviderSpec::from_resolver(resolver)?;

    let node_name = resolver.get_or("proxmox", "node", "r240");
    let storage_pool = resolver.get_or("", "storagePool", "local-zfs");
    let bridge = resolver.get_or("", "bridge", "vmbr0");
    let asset_dir = resolver.get_or("", "cloudInitDir", "cloud-init");

    let overrides = OverrideTable::parse(resolver, &VM_ROLES)?;
    let tailscale_auth_key = resolver.require_secret("tailscale", "authKey")?;

    // Resolve every sizing value up front so a missing key aborts the build
    // before any VM specification exists.
    let mut sizings: BTreeMap<String, VmSizing> = BTreeMap::new();
    for role in &ROLES {
        sizings.insert(
            role.key.to_string(),
            VmSizing {
                cpu_cores: resolver.require_number("vms", &format!("{}:cpu", role.key))?,
                memory_mb: resolver.require_number("vms", &format!("{}:memory", role.key))?,
                disk_gb: resolver.require_number("vms", &format!("{}:diskSize", role.key))?,
            },
        );
    }

    let account_template = resolve_account(resolver)?;

    let mut cloud_init_templates =
        vec![CloudInitTemplateSpec::common(node_name, storage_pool, asset_dir)];

    let mut vms: BTreeMap<String, VmSpec> = BTreeMap::new();
    for role in &ROLES {
        let template =
            CloudInitTemplateSpec::for_role(role.key, node_name, storage_pool, asset_dir);
        let sizing = &sizings[role.key];
        let vm_overrides = overrides.for_vm(role.key);

        let mac = vm_overrides
            .mac
            .unwrap_or_else(|| MacAddress::for_role_index(role.mac_index));

        let spec = VmSpecBuilder::new(VmIdentity::new(role.name, role.vm_id, role.key), node_name)
            .storage_pool(storage_pool)
            .bridge(bridge)
            .description(role.description)
            .tags(role.tags)
            .cores(sizing.cpu_cores)
            .memory_mb(sizing.memory_mb)
            .disk(DiskOptions {
                size_gb: sizing.disk_gb,
                use_solid_state: role.use_solid_state,
                io_engine: role.io_engine.map(str::to_string),
            })
            .mac(mac)
            .vlan(vm_overrides.vlan_id)
            .init(InitPayload {
                network: NetworkBootstrap::Dhcp,
                account: account_template.clone(),
                user_data_file_id: template.id().to_string(),
                replace_vars: replace_vars_for(resolver, role.key, &tailscale_auth_key),
            })
            .boot_media(vm_overrides.boot_iso)
            .startup_order(role.startup_order)
            .build()?;

        cloud_init_templates.push(template);
        vms.insert(role.key.to_string(), spec);
    }

    check_uniqueness(&vms)?;

    let firewall = FirewallSpec::homelab(node_name);
    firewall.validate()?;

    let exports = Exports::compute(
        &vms,
        &sizings,
        node_name,
        storage_pool,
        tailscale_auth_key,
    );

    info!(
        "Built deployment for node {}: {} VMs, {} vCPU, {} GB memory, {} GB storage",
        node_name,
        vms.len(),
        exports.total_vcpu,
        exports.total_memory_gb,
        exports.total_storage_gb
    );

    Ok(Deployment {
        provider,
        cloud_init_templates,
        vms,
        firewall,
        exports,
    })
}

/// Resolve the shared first-boot account.
///
/// No credential is ever defaulted: the stack must supply an SSH public key
/// or an explicit crypt hash, or the build fails.
fn resolve_account(resolver: &ConfigResolver) -> Result<UserAccount> {
    let username = resolver.get_or("ssh", "username", "ubuntu").to_string();
    let keys = resolver
        .get("ssh", "publicKey")
        .map(|k| vec![k.to_string()])
        .unwrap_or_default();
    let password = resolver.get("ssh", "passwordHash").map(str::to_string);

    let account = UserAccount {
        username,
        uid: 1000,
        password,
        keys,
    };
    account.validate()?;
    Ok(account)
}

/// Template substitution variables for one role.
///
/// Every VM joins the VPN mesh; the gateway additionally receives its tunnel
/// and domain settings when they are configured.
fn replace_vars_for(
    resolver: &ConfigResolver,
    role: &str,
    tailscale_auth_key: &Secret,
) -> BTreeMap<String, TemplateVar> {
    let mut vars = BTreeMap::new();
    vars.insert(
        "TAILSCALE_AUTHKEY".to_string(),
        TemplateVar::Secret(tailscale_auth_key.clone()),
    );

    if role == "gw" {
        if let Some(account_id) = resolver.get("cloudflare", "accountId") {
            vars.insert(
                "CLOUDFLARE_ACCOUNT_ID".to_string(),
                TemplateVar::Plain(account_id.to_string()),
            );
        }
        if let Some(tunnel_id) = resolver.get("cloudflare", "tunnelId") {
            vars.insert(
                "CLOUDFLARE_TUNNEL_ID".to_string(),
                TemplateVar::Plain(tunnel_id.to_string()),
            );
        }
        if let Some(tunnel_secret) = resolver.get_secret("cloudflare", "tunnelSecret") {
            vars.insert(
                "CLOUDFLARE_TUNNEL_SECRET".to_string(),
                TemplateVar::Secret(tunnel_secret),
            );
        }
        if let Some(domain) = resolver.get("", "domain") {
            vars.insert("DOMAIN".to_string(), TemplateVar::Plain(domain.to_string()));
        }
    }

    vars
}

/// Reject MAC or VM-id collisions before handoff to the engine
fn check_uniqueness(vms: &BTreeMap<String, VmSpec>) -> Result<()> {
    let mut seen_macs: BTreeMap<MacAddress, &str> = BTreeMap::new();
    let mut seen_ids: BTreeMap<u32, &str> = BTreeMap::new();

    for (role, spec) in vms {
        let mac = spec.network_device[0].mac_address;
        if let Some(other) = seen_macs.insert(mac, role) {
            return Err(DeployError::validation(format!(
                "MAC address {} is shared by VMs {} and {}",
                mac, other, role
            )));
        }
        if let Some(other) = seen_ids.insert(spec.vm_id, role) {
            return Err(DeployError::validation(format!(
                "VM id {} is shared by VMs {} and {}",
                spec.vm_id, other, role
            )));
        }
    }

    Ok(())
}
