// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin loading for Shipwright hosts.
//!
//! [`ModuleLoader`] opens a dynamically linked plugin module and checks it
//! against a capability contract, [`PluginRegistry`] stores the result per
//! kind, and [`Discovery`] ties the two together over a plugin directory.
//! [`lifecycle`] runs `init`/`shutdown` over what was registered, and
//! [`host`] provides the logger and HTTP client plugins are given.

pub mod discovery;
pub mod host;
pub mod lifecycle;
pub mod loader;
pub mod registry;

pub use discovery::{Discovery, DiscoveryFailure, DiscoveryOptions, DiscoveryReport, Registration};
pub use host::{ReqwestHttpClient, TracingLogger};
pub use lifecycle::{initialize_plugins, resolve_config, shutdown_plugins, LifecycleReport};
pub use loader::{LoadedModule, ModuleLoader};
pub use registry::{identifier_of, init_registry, registry, PluginRegistry};
