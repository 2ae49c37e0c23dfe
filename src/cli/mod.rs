// file: src/cli/mod.rs
// version: 1.0.0
// guid: 57e2a8c4-b903-4d71-8f6b-c49e03a7d216

//! Command line interface

pub mod args;
pub mod commands;

pub use args::Cli;
pub use commands::*;
