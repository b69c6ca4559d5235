// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host configuration for Shipwright.
//!
//! Parses `shipwright.toml` with strict key checking, merges the XDG file
//! hierarchy with `SHIPWRIGHT_*` environment overrides, and reports problems
//! as miette diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use shipwright_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("scanning {}", config.discovery.directory.display());
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::{Path, PathBuf};

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{DiscoveryConfig, HostConfig, ShipwrightConfig};

/// Load configuration from the XDG hierarchy and validate it.
pub fn load_and_validate() -> Result<ShipwrightConfig, Vec<ConfigError>> {
    checked(loader::load_config(), collect_toml_sources)
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<ShipwrightConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_path(path), || {
        read_sources([absolute(path)])
    })
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<ShipwrightConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Validate an extracted config, or turn the extraction error into diagnostics.
///
/// Source files are only read when extraction failed.
fn checked(
    extracted: Result<ShipwrightConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<ShipwrightConfig, Vec<ConfigError>> {
    match extracted {
        Ok(config) => validation::validate_config(&config).map(|()| config),
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Contents of every config file in the hierarchy that exists.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut candidates = vec![absolute(Path::new("shipwright.toml"))];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("shipwright").join("shipwright.toml"));
    }
    candidates.push(PathBuf::from("/etc/shipwright/shipwright.toml"));
    read_sources(candidates)
}

fn read_sources(paths: impl IntoIterator<Item = PathBuf>) -> Vec<(String, String)> {
    paths
        .into_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            Some((path.display().to_string(), content))
        })
        .collect()
}
