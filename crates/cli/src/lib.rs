//! Cosign CLI - command orchestration
//!
//! This crate provides the `cosign` binary and the context that loads a
//! wallet from its data directory and writes it back after each command.

pub mod commands;
pub mod context;

pub use context::{AppContext, CliWallet};
