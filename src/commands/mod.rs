//! Command implementations for the CLI
//!
//! - serve: Start the HTTP server
//! - test: Validate configuration and model artifacts
//! - config: Configuration display
//! - logs: Query the prediction log database

pub mod config;
pub mod logs;
pub mod serve;
