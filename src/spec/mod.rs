// file: src/spec/mod.rs
// version: 1.0.0
// guid: 0b6a3d97-e824-4c15-9f60-17c8b52ad409

//! Declarative resource specification types and builders
//!
//! Everything in this module is a pure value object: building a specification
//! has no side effects, and actual provisioning is delegated entirely to the
//! external orchestration engine.

pub mod builder;
pub mod cloudinit;
pub mod firewall;
pub mod provider;
pub mod vm;

pub use builder::{DiskOptions, InitPayload, VmIdentity, VmSpecBuilder};
pub use cloudinit::CloudInitTemplateSpec;
pub use firewall::{Direction, FirewallRule, FirewallSpec, RuleAction};
pub use provider::ProviderSpec;
pub use vm::{
    AgentSpec, CdromSpec, CpuSpec, DiskSpec, InitializationSpec, MacAddress, MemorySpec,
    NetworkBootstrap, NetworkDeviceSpec, TemplateVar, UserAccount, VmSpec,
};
