//! TOML configuration: scan defaults, secret tuning, custom rules, and the
//! allow-list.

mod loader;
mod models;

use crate::errors::ScanError;
use std::path::Path;

pub use models::{AllowEntry, Config, CustomRule, ScanConfig, SecretsConfig};

impl Config {
    /// Loads configuration from default locations (`.vigil.toml` or
    /// `vigil.toml` in the current directory or any ancestor).
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] when a discovered file cannot be read
    /// or parsed. A missing file is not an error.
    pub fn load() -> Result<Self, ScanError> {
        Self::load_from_path(Path::new("."))
    }

    /// Loads configuration starting from a specific path and traversing up.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] when a discovered file cannot be read
    /// or parsed. A missing file is not an error.
    pub fn load_from_path(path: &Path) -> Result<Self, ScanError> {
        loader::load_from_path(path)
    }
}

#[cfg(test)]
mod tests;
