//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the TOML configuration file from the
//! platform-appropriate directory, writes it back, supplies defaults on first
//! run, and resolves where the shared store lives.

pub mod config;
