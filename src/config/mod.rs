//! Configuration module
//!
//! Client settings (endpoint, proxy, timeouts) and output preferences,
//! read from a TOML file.

pub mod config;
