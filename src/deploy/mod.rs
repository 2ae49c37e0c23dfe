// file: src/deploy/mod.rs
// version: 1.0.0
// guid: f8a51d39-7c04-4be6-92d7-0e63a8b4c175

//! Deployment assembly for the fixed homelab VM set

pub mod homelab;
pub mod summary;

pub use homelab::{build_deployment, Deployment, VM_ROLES};
pub use summary::{Exports, VmSizing};
