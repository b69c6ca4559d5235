// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Shipwright plugins.
//!
//! This crate is the contract shared by hosts and dynamically loaded plugin
//! modules: capability traits, the DTOs they exchange, the tagged
//! [`PluginHandle`] stored by registries, and the [`export_plugin!`] macro a
//! module uses to publish itself.

pub mod capability;
pub mod declaration;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use capability::{
    Capability, DeployerCapability, GenericCapability, PluginHandle, ProviderCapability,
};
pub use declaration::{
    AbiFingerprint, DeclarationHeader, PluginDeclaration, CONTRACT_VERSION, PLUGIN_SYMBOL,
};
pub use error::ShipwrightError;
pub use types::{CapabilityKind, ConfigField, FieldType, IdentifierSource, PluginConfig};

// Re-export all contract traits at crate root.
pub use traits::{Deployer, HostLogger, HttpClient, Plugin, Provider, Router};
