//! Shared utilities for stockwise
//!
//! This crate provides common functionality used across the stockwise workspace:
//! tracing subscriber setup and environment variable helpers.

pub mod config;
pub mod logging;

pub use config::env_non_empty;
pub use logging::{LogFormat, init_tracing};
