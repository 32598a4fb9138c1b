//! Centralized configuration (environment variables + defaults).

use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "app/data";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Directory holding one CSV file per entity.
pub fn data_dir() -> PathBuf {
    std::env::var("DATA_DIR")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Address the API server listens on.
pub fn bind_addr() -> String {
    std::env::var("BIND_ADDR")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
}

/// Default tracing filter when `RUST_LOG` is not set.
pub fn log_filter() -> String {
    std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
}
