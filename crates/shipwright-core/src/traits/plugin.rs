// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base contract every plugin implements.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ShipwrightError;
use crate::traits::logger::HostLogger;
use crate::traits::router::Router;
use crate::types::{ConfigField, PluginConfig};

/// The base trait for all Shipwright plugins.
///
/// Every deployer and provider also implements this trait, which provides
/// identity, lifecycle, and configuration metadata.
#[async_trait]
pub trait Plugin: Send + Sync + 'static {
    /// Returns the package name used to identify the plugin in the registry.
    fn package_name(&self) -> &str;

    /// Returns the human-readable plugin name.
    fn name(&self) -> &str;

    /// Initializes the plugin with its resolved configuration.
    ///
    /// The router lets the plugin mount HTTP handlers (OAuth callbacks,
    /// webhooks) on the host. The logger forwards into the host's log
    /// pipeline.
    async fn init(
        &self,
        config: PluginConfig,
        router: Arc<dyn Router>,
        logger: Arc<dyn HostLogger>,
    ) -> Result<(), ShipwrightError>;

    /// Gracefully stops the plugin, releasing any held resources.
    async fn shutdown(&self) -> Result<(), ShipwrightError>;

    /// Returns the plugin version, ideally a semver string.
    fn version(&self) -> &str;

    /// Returns a short description of what the plugin does.
    fn description(&self) -> &str;

    /// Returns the configuration fields the plugin accepts.
    fn config_fields(&self) -> Vec<ConfigField>;
}
