//! Command-line interface: argument parsing and command handlers.

pub mod commands;
pub mod handlers;

pub use commands::{CliArgs, Commands, DeployArgs, HealthArgs};
