// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./shipwright.toml` > `~/.config/shipwright/shipwright.toml`
//! > `/etc/shipwright/shipwright.toml` with environment variable overrides via
//! the `SHIPWRIGHT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ShipwrightConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/shipwright/shipwright.toml` (system-wide)
/// 3. `~/.config/shipwright/shipwright.toml` (user XDG config)
/// 4. `./shipwright.toml` (local directory)
/// 5. `SHIPWRIGHT_*` environment variables
pub fn load_config() -> Result<ShipwrightConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<ShipwrightConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ShipwrightConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ShipwrightConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ShipwrightConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ShipwrightConfig::default()))
        .merge(Toml::file("/etc/shipwright/shipwright.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("shipwright/shipwright.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("shipwright.toml"))
        .merge(env_provider())
}

/// Environment provider mapping `SHIPWRIGHT_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys such as
/// `log_level` contain underscores. Per-plugin tables are not reachable from
/// the environment since plugin identifiers may contain any character.
fn env_provider() -> Env {
    Env::prefixed("SHIPWRIGHT_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("host_", "host.", 1)
            .replacen("discovery_", "discovery.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_discovery_directory() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SHIPWRIGHT_DISCOVERY_DIRECTORY", "/opt/plugins");
            jail.set_env("SHIPWRIGHT_HOST_LOG_LEVEL", "debug");
            let config = build_figment().extract::<ShipwrightConfig>()?;
            assert_eq!(config.discovery.directory, Path::new("/opt/plugins"));
            assert_eq!(config.host.log_level, "debug");
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "shipwright.toml",
                r#"
[discovery]
pattern = "*.plugin"
concurrent = false
"#,
            )?;
            let config = build_figment().extract::<ShipwrightConfig>()?;
            assert_eq!(config.discovery.pattern, "*.plugin");
            assert!(!config.discovery.concurrent);
            Ok(())
        });
    }
}
