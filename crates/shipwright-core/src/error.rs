// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Shipwright hosts and plugins.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::CapabilityKind;

/// The primary error type used by capability contracts, the module loader,
/// and the plugin registry.
#[derive(Debug, Error)]
pub enum ShipwrightError {
    /// Configuration errors (missing required plugin fields, invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The shared module could not be opened, or was built against an
    /// incompatible toolchain or contract version.
    #[error("failed to open plugin module {}: {reason}", path.display())]
    ModuleOpen { path: PathBuf, reason: String },

    /// The module does not export the expected declaration symbol.
    #[error("plugin module {} does not export symbol `{symbol}`", path.display())]
    SymbolNotFound { path: PathBuf, symbol: String },

    /// The loaded value does not implement the requested capability contract.
    #[error("{subject} does not implement the {} contract", expected.contract_name())]
    CapabilityMismatch {
        subject: String,
        expected: CapabilityKind,
    },

    /// A plugin with the same identifier already exists in the store.
    #[error("plugin already registered: {kind}/{id}")]
    AlreadyRegistered { kind: CapabilityKind, id: String },

    /// No plugin with the given identifier exists in the store.
    #[error("plugin not found: {kind}/{id}")]
    NotFound { kind: CapabilityKind, id: String },

    /// The process-wide registry was used before `init_registry`.
    #[error("plugin registry used before initialization")]
    RegistryUninitialized,

    /// `init_registry` was called more than once.
    #[error("plugin registry already initialized")]
    RegistryAlreadyInitialized,

    /// The discovery root could not be enumerated.
    #[error("invalid plugin root {}: {reason}", path.display())]
    InvalidPluginRoot { path: PathBuf, reason: String },

    /// Errors raised by a plugin while executing a contract operation.
    #[error("plugin error: {message}")]
    Plugin {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// HTTP collaborator errors (connection failure, bad status, decoding).
    #[error("http error: {message}")]
    Http {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ShipwrightError {
    /// Shorthand for a plugin error without an underlying source.
    pub fn plugin(message: impl Into<String>) -> Self {
        Self::Plugin {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for an HTTP error without an underlying source.
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
            source: None,
        }
    }
}
