// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logging collaborator handed to plugins.
//!
//! A dynamically loaded module links its own copy of every logging crate, so
//! it cannot see the host's global subscriber. Plugins log through this trait
//! instead.

/// Sink for plugin log messages.
pub trait HostLogger: Send + Sync {
    fn debug(&self, msg: &str);

    fn info(&self, msg: &str);

    fn warn(&self, msg: &str);

    fn error(&self, err: &dyn std::error::Error, msg: &str);
}
