//! # Common Components
//!
//! Shared utilities used by both binaries.
//!
//! ## Modules
//!
//! - [`config`]: TOML configuration parsing

pub mod config;
