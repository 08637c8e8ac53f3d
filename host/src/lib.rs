//! Native Bridge host library
//!
//! Loads the Cargo-built and cc-built greeting modules into one process and
//! exposes them through the [`facade::HostApp`] façade. It is used by both
//! the binary and the integration tests.

/// Configuration management module
pub mod config;

/// Host façade over the bound native handles
pub mod facade;

/// Runtime module for loading native modules
pub mod runtime;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;

/// Platform-specific utilities module
pub mod platform;
