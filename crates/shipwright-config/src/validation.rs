// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as glob syntax, duplicate kinds, and symbol names.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::ShipwrightConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ShipwrightConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.host.log_level.trim().to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "host.log_level `{}` is not one of {}",
                config.host.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    let discovery = &config.discovery;

    if discovery.directory.as_os_str().is_empty() {
        errors.push(ConfigError::Validation {
            message: "discovery.directory must not be empty".to_string(),
        });
    }

    if discovery.pattern.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "discovery.pattern must not be empty".to_string(),
        });
    } else if discovery.pattern.contains('/') || discovery.pattern.contains('\\') {
        // The pattern is matched against file names only.
        errors.push(ConfigError::Validation {
            message: format!(
                "discovery.pattern `{}` must match file names, not paths",
                discovery.pattern
            ),
        });
    } else if let Err(e) = glob::Pattern::new(&discovery.pattern) {
        errors.push(ConfigError::Validation {
            message: format!("discovery.pattern `{}` is not a valid glob: {e}", discovery.pattern),
        });
    }

    if discovery.kinds.is_empty() {
        errors.push(ConfigError::Validation {
            message: "discovery.kinds must list at least one capability kind".to_string(),
        });
    }

    let mut seen_kinds = HashSet::new();
    for kind in &discovery.kinds {
        if !seen_kinds.insert(kind) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate kind `{kind}` in discovery.kinds"),
            });
        }
    }

    let symbol = discovery.symbol.as_str();
    let symbol_is_identifier = symbol
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && symbol.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !symbol_is_identifier {
        errors.push(ConfigError::Validation {
            message: format!("discovery.symbol `{symbol}` is not a valid symbol name"),
        });
    }

    for id in config.plugins.keys() {
        if id.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "plugin configuration table with an empty identifier".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipwright_core::CapabilityKind;

    fn messages(config: &ShipwrightConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        let config = ShipwrightConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = ShipwrightConfig::default();
        config.host.log_level = "verbose".to_string();
        assert!(messages(&config).iter().any(|m| m.contains("host.log_level")));
    }

    #[test]
    fn pattern_with_path_separator_fails_validation() {
        let mut config = ShipwrightConfig::default();
        config.discovery.pattern = "lib/*.so".to_string();
        assert!(messages(&config).iter().any(|m| m.contains("not paths")));
    }

    #[test]
    fn invalid_glob_fails_validation() {
        let mut config = ShipwrightConfig::default();
        config.discovery.pattern = "[*.so".to_string();
        assert!(messages(&config).iter().any(|m| m.contains("not a valid glob")));
    }

    #[test]
    fn duplicate_and_empty_kinds_fail_validation() {
        let mut config = ShipwrightConfig::default();
        config.discovery.kinds = vec![CapabilityKind::Deployer, CapabilityKind::Deployer];
        assert!(messages(&config).iter().any(|m| m.contains("duplicate kind `deployer`")));

        config.discovery.kinds.clear();
        assert!(messages(&config).iter().any(|m| m.contains("at least one")));
    }

    #[test]
    fn symbol_must_be_identifier() {
        let mut config = ShipwrightConfig::default();
        config.discovery.symbol = "1plugin".to_string();
        assert!(messages(&config).iter().any(|m| m.contains("discovery.symbol")));

        config.discovery.symbol = "_shipwright_plugin".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = ShipwrightConfig::default();
        config.host.log_level = "loud".to_string();
        config.discovery.pattern = String::new();
        config.discovery.symbol = String::new();
        assert_eq!(validate_config(&config).unwrap_err().len(), 3);
    }
}
