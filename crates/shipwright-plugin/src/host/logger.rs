// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`HostLogger`] backed by the host's tracing subscriber.
//!
//! A dynamically loaded module links its own copy of `tracing`, whose global
//! dispatcher is never set. Plugins log through this adapter instead, so
//! their output lands in the host's subscriber tagged with the plugin id.

use std::sync::Arc;

use shipwright_core::HostLogger;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct TracingLogger {
    plugin: String,
}

impl TracingLogger {
    pub fn new(plugin: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
        }
    }

    /// A logger factory suitable for `initialize_plugins`.
    pub fn factory(plugin: &str) -> Arc<dyn HostLogger> {
        Arc::new(Self::new(plugin))
    }

    pub fn plugin(&self) -> &str {
        &self.plugin
    }
}

impl HostLogger for TracingLogger {
    fn debug(&self, msg: &str) {
        debug!(plugin = %self.plugin, "{msg}");
    }

    fn info(&self, msg: &str) {
        info!(plugin = %self.plugin, "{msg}");
    }

    fn warn(&self, msg: &str) {
        warn!(plugin = %self.plugin, "{msg}");
    }

    fn error(&self, err: &dyn std::error::Error, msg: &str) {
        error!(plugin = %self.plugin, error = %err, "{msg}");
    }
}
