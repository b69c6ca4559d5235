// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Shipwright hosts.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use shipwright_core::{CapabilityKind, IdentifierSource, PLUGIN_SYMBOL};

/// Top-level Shipwright configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ShipwrightConfig {
    /// Host process settings.
    #[serde(default)]
    pub host: HostConfig,

    /// Plugin discovery settings.
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Per-plugin configuration handed to `Plugin::init`, keyed by plugin
    /// identifier.
    #[serde(default)]
    pub plugins: BTreeMap<String, BTreeMap<String, String>>,
}

/// Host process configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Plugin discovery configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Directory scanned for plugin modules.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Glob matched against file names in `directory`.
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Capability kinds each module is checked against.
    #[serde(default = "default_kinds")]
    pub kinds: Vec<CapabilityKind>,

    /// Accessor used as the registry identifier.
    #[serde(default)]
    pub identifier: IdentifierSource,

    /// Exported symbol holding the plugin declaration.
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Load modules in parallel.
    #[serde(default = "default_concurrent")]
    pub concurrent: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            pattern: default_pattern(),
            kinds: default_kinds(),
            identifier: IdentifierSource::default(),
            symbol: default_symbol(),
            concurrent: default_concurrent(),
        }
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("plugins")
}

/// Shared-library glob for the platform the host was built for.
pub fn default_pattern() -> String {
    if cfg!(target_os = "windows") {
        "*.dll".to_string()
    } else if cfg!(target_os = "macos") {
        "*.dylib".to_string()
    } else {
        "*.so".to_string()
    }
}

fn default_kinds() -> Vec<CapabilityKind> {
    CapabilityKind::ALL.to_vec()
}

fn default_symbol() -> String {
    PLUGIN_SYMBOL.to_string()
}

fn default_concurrent() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_kind() {
        let config = ShipwrightConfig::default();
        assert_eq!(config.discovery.kinds, CapabilityKind::ALL.to_vec());
        assert_eq!(config.discovery.symbol, "Plugin");
        assert_eq!(config.discovery.identifier, IdentifierSource::PackageName);
        assert!(config.plugins.is_empty());
    }

    #[test]
    fn plugin_tables_deserialize_by_identifier() {
        let toml_str = r#"
[plugins.acme-deployer]
region = "eu-west-1"
token = "abc"

[plugins."com.example.github"]
client_id = "xyz"
"#;
        let config: ShipwrightConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.plugins.len(), 2);
        assert_eq!(config.plugins["acme-deployer"]["region"], "eu-west-1");
        assert_eq!(config.plugins["com.example.github"]["client_id"], "xyz");
    }

    #[test]
    fn identifier_source_parses_snake_case() {
        let toml_str = r#"
[discovery]
identifier = "name"
kinds = ["deployer"]
"#;
        let config: ShipwrightConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.discovery.identifier, IdentifierSource::Name);
        assert_eq!(config.discovery.kinds, vec![CapabilityKind::Deployer]);
    }
}
