// file: src/logging/mod.rs
// version: 1.0.0
// guid: 9c41e8b0-5f27-4d83-a6e9-1b72c0d53f48

//! Logging system for the homelab deployment builder

pub mod logger;

pub use logger::init_logger;
