// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Initializing and shutting down registered plugins.

use std::collections::BTreeMap;
use std::sync::Arc;

use shipwright_core::traits::{HostLogger, Router};
use shipwright_core::{CapabilityKind, ConfigField, PluginConfig, ShipwrightError};
use tracing::{debug, error, info, warn};

use crate::registry::PluginRegistry;

/// Per-plugin outcome of an init or shutdown pass.
#[derive(Debug, Default)]
pub struct LifecycleReport {
    pub succeeded: Vec<String>,
    /// Plugin identifier and error message.
    pub failed: Vec<(String, String)>,
}

impl LifecycleReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Merge the operator's values for a plugin with the defaults its fields
/// declare.
///
/// Keys the plugin does not declare are passed through. A required field
/// with neither a value nor a default is an error; all such fields are named
/// in one message.
pub fn resolve_config(
    fields: &[ConfigField],
    provided: &BTreeMap<String, String>,
) -> Result<PluginConfig, ShipwrightError> {
    let mut config: PluginConfig = provided
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    let mut missing = Vec::new();
    for field in fields {
        let has_value = config.get(&field.key).is_some_and(|v| !v.is_empty());
        if has_value {
            continue;
        }
        match &field.default {
            Some(default) => {
                config.insert(field.key.clone(), default.clone());
            }
            None if field.required => missing.push(field.key.as_str()),
            None => {}
        }
    }

    if missing.is_empty() {
        Ok(config)
    } else {
        Err(ShipwrightError::Config(format!(
            "missing required field(s): {}",
            missing.join(", ")
        )))
    }
}

/// Call `init` on every registered plugin, in identifier order.
///
/// Each plugin gets its own router group under `/plugins/<id>` and a logger
/// built by `logger_factory`. Failures are logged and recorded; they do not
/// stop the remaining plugins from initializing.
pub async fn initialize_plugins<F>(
    registry: &PluginRegistry,
    configs: &BTreeMap<String, BTreeMap<String, String>>,
    router: Arc<dyn Router>,
    logger_factory: F,
) -> LifecycleReport
where
    F: Fn(&str) -> Arc<dyn HostLogger>,
{
    let empty = BTreeMap::new();
    let mut report = LifecycleReport::default();

    for id in registry.identifiers(CapabilityKind::Generic) {
        let plugin = match registry.plugin(&id) {
            Ok(plugin) => plugin,
            Err(e) => {
                report.failed.push((id, e.to_string()));
                continue;
            }
        };

        if let Err(e) = semver::Version::parse(plugin.version()) {
            warn!(plugin_id = %id, version = plugin.version(), error = %e, "plugin version is not valid semver");
        }

        let provided = configs.get(&id).unwrap_or(&empty);
        let result = match resolve_config(&plugin.config_fields(), provided) {
            Ok(config) => {
                let group = router.group(&format!("/plugins/{id}"));
                plugin.init(config, group, logger_factory(&id)).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                info!(plugin_id = %id, version = plugin.version(), "plugin initialized");
                report.succeeded.push(id);
            }
            Err(e) => {
                error!(plugin_id = %id, error = %e, "plugin initialization failed");
                report.failed.push((id, e.to_string()));
            }
        }
    }
    report
}

/// Call `shutdown` on every registered plugin, in identifier order.
pub async fn shutdown_plugins(registry: &PluginRegistry) -> LifecycleReport {
    let mut report = LifecycleReport::default();
    for id in registry.identifiers(CapabilityKind::Generic) {
        let result = match registry.plugin(&id) {
            Ok(plugin) => plugin.shutdown().await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                debug!(plugin_id = %id, "plugin shut down");
                report.succeeded.push(id);
            }
            Err(e) => {
                error!(plugin_id = %id, error = %e, "plugin shutdown failed");
                report.failed.push((id, e.to_string()));
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipwright_core::{FieldType, PluginHandle};
    use shipwright_test_utils::{CapturingLogger, MockDeployer, MockPlugin, RecordingRouter};

    fn provided(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn fields() -> Vec<ConfigField> {
        vec![
            ConfigField::new("token", "API Token", FieldType::Password).required(),
            ConfigField::new("region", "Region", FieldType::Select)
                .with_options(["eu-west-1", "us-east-1"])
                .with_default("eu-west-1"),
            ConfigField::new("notes", "Notes", FieldType::Textarea),
        ]
    }

    #[test]
    fn defaults_fill_absent_fields() {
        let config = resolve_config(&fields(), &provided(&[("token", "abc")])).unwrap();
        assert_eq!(config["token"], "abc");
        assert_eq!(config["region"], "eu-west-1");
        assert!(!config.contains_key("notes"));
    }

    #[test]
    fn provided_values_win_and_extras_pass_through() {
        let config = resolve_config(
            &fields(),
            &provided(&[("token", "abc"), ("region", "us-east-1"), ("debug", "true")]),
        )
        .unwrap();
        assert_eq!(config["region"], "us-east-1");
        assert_eq!(config["debug"], "true");
    }

    #[test]
    fn missing_required_fields_are_all_named() {
        let mut fields = fields();
        fields.push(ConfigField::new("project", "Project", FieldType::Text).required());
        let err = resolve_config(&fields, &provided(&[("token", "")])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("token"), "got {message}");
        assert!(message.contains("project"), "got {message}");
    }

    #[tokio::test]
    async fn initialize_runs_every_plugin_with_its_config() {
        let registry = PluginRegistry::new();
        let acme = Arc::new(MockDeployer::new("acme-deployer").with_fields(fields()));
        let plain = Arc::new(MockPlugin::new("plain"));
        registry
            .register(
                CapabilityKind::Generic,
                PluginHandle::deployer(acme.clone()),
                |p| p.package_name().to_string(),
            )
            .unwrap();
        registry
            .register(
                CapabilityKind::Generic,
                PluginHandle::generic(plain.clone()),
                |p| p.package_name().to_string(),
            )
            .unwrap();

        let mut configs = BTreeMap::new();
        configs.insert("acme-deployer".to_string(), provided(&[("token", "t0k")]));
        let router = Arc::new(RecordingRouter::new());
        let logger: Arc<dyn HostLogger> = Arc::new(CapturingLogger::new());

        let report = initialize_plugins(&registry, &configs, router.clone(), |_| logger.clone()).await;
        assert!(report.is_clean(), "{report:?}");
        assert_eq!(report.succeeded, vec!["acme-deployer", "plain"]);

        let received = acme.init_config().unwrap();
        assert_eq!(received["token"], "t0k");
        assert_eq!(received["region"], "eu-west-1");
        assert!(plain.init_config().is_some());
        assert!(router.routes().iter().any(|r| r.path == "/plugins/acme-deployer/status"));
    }

    #[tokio::test]
    async fn missing_required_config_fails_only_that_plugin() {
        let registry = PluginRegistry::new();
        let acme = Arc::new(MockDeployer::new("acme-deployer").with_fields(fields()));
        registry
            .register(CapabilityKind::Generic, PluginHandle::deployer(acme.clone()), |p| {
                p.package_name().to_string()
            })
            .unwrap();
        registry
            .register(
                CapabilityKind::Generic,
                PluginHandle::generic(Arc::new(MockPlugin::new("plain"))),
                |p| p.package_name().to_string(),
            )
            .unwrap();

        let logger: Arc<dyn HostLogger> = Arc::new(CapturingLogger::new());
        let report = initialize_plugins(
            &registry,
            &BTreeMap::new(),
            Arc::new(RecordingRouter::new()),
            |_| logger.clone(),
        )
        .await;

        assert_eq!(report.succeeded, vec!["plain"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "acme-deployer");
        assert!(report.failed[0].1.contains("token"));
        assert!(acme.init_config().is_none());
    }

    #[tokio::test]
    async fn shutdown_reaches_every_plugin() {
        let registry = PluginRegistry::new();
        let a = Arc::new(MockPlugin::new("a"));
        let b = Arc::new(MockPlugin::new("b").failing_shutdown());
        for plugin in [a.clone(), b.clone()] {
            registry
                .register(CapabilityKind::Generic, PluginHandle::generic(plugin), |p| {
                    p.package_name().to_string()
                })
                .unwrap();
        }

        let report = shutdown_plugins(&registry).await;
        assert_eq!(report.succeeded, vec!["a"]);
        assert_eq!(report.failed[0].0, "b");
        assert!(a.was_shut_down());
        assert!(b.was_shut_down());
    }

    #[test]
    fn clean_report() {
        assert!(LifecycleReport::default().is_clean());
    }
}
