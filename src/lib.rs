// file: src/lib.rs
// version: 1.0.0
// guid: 7a1d4e92-06cb-4b3f-9f88-2d5a6c41e0b7

//! # Proxmox Homelab Deploy
//!
//! Declarative resource-specification builder for a fixed four-VM homelab on a
//! single Proxmox host. The crate resolves a per-stack configuration file,
//! builds one complete VM specification per role (compute, disk, NIC, boot,
//! agent, cloud-init), a deny-by-default firewall ruleset, and aggregate
//! exports, then hands the whole document to an external orchestration engine.
//!
//! Nothing here talks to the hypervisor: building is pure, fail-fast, and
//! idempotent — the same stack file always produces byte-identical output.

pub mod cli;
pub mod config;
pub mod deploy;
pub mod error;
pub mod logging;
pub mod spec;

pub use error::{DeployError, Result};

/// Version information for the utility
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
