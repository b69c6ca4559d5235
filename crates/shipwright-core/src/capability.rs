// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tagged plugin values and checked narrowing to capability contracts.
//!
//! A [`PluginHandle`] carries one plugin instance together with every
//! capability view it was built with. Registry stores hold handles and hand
//! out typed views through the [`Capability`] markers.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::error::ShipwrightError;
use crate::traits::{Deployer, Plugin, Provider};
use crate::types::CapabilityKind;

/// One plugin instance viewed through the capabilities it implements.
///
/// All views point at the same allocation; the constructors take a single
/// `Arc<T>` and coerce it once per implemented trait.
#[derive(Clone)]
pub struct PluginHandle {
    plugin: Arc<dyn Plugin>,
    deployer: Option<Arc<dyn Deployer>>,
    provider: Option<Arc<dyn Provider>>,
}

impl PluginHandle {
    /// A plugin that only implements the base contract.
    pub fn generic<T: Plugin>(plugin: Arc<T>) -> Self {
        Self {
            plugin,
            deployer: None,
            provider: None,
        }
    }

    pub fn deployer<T: Deployer>(plugin: Arc<T>) -> Self {
        Self {
            plugin: plugin.clone(),
            deployer: Some(plugin),
            provider: None,
        }
    }

    pub fn provider<T: Provider>(plugin: Arc<T>) -> Self {
        Self {
            plugin: plugin.clone(),
            deployer: None,
            provider: Some(plugin),
        }
    }

    /// A plugin acting as both deployment backend and git provider.
    pub fn deployer_and_provider<T: Deployer + Provider>(plugin: Arc<T>) -> Self {
        Self {
            plugin: plugin.clone(),
            deployer: Some(plugin.clone()),
            provider: Some(plugin),
        }
    }

    /// The base contract view, always present.
    pub fn plugin(&self) -> &Arc<dyn Plugin> {
        &self.plugin
    }

    pub fn as_deployer(&self) -> Option<Arc<dyn Deployer>> {
        self.deployer.clone()
    }

    pub fn as_provider(&self) -> Option<Arc<dyn Provider>> {
        self.provider.clone()
    }

    /// Whether this handle can be stored under `kind`.
    pub fn satisfies(&self, kind: CapabilityKind) -> bool {
        match kind {
            CapabilityKind::Generic => true,
            CapabilityKind::Deployer => self.deployer.is_some(),
            CapabilityKind::Provider => self.provider.is_some(),
        }
    }

    /// Every kind this handle satisfies.
    pub fn capabilities(&self) -> BTreeSet<CapabilityKind> {
        CapabilityKind::ALL
            .into_iter()
            .filter(|kind| self.satisfies(*kind))
            .collect()
    }

    /// Checked narrowing to a capability view.
    pub fn narrow<C: Capability>(&self) -> Result<Arc<C::Object>, ShipwrightError> {
        C::narrow(self).ok_or_else(|| ShipwrightError::CapabilityMismatch {
            subject: format!("plugin `{}`", self.plugin.package_name()),
            expected: C::KIND,
        })
    }

    /// Whether both handles wrap the same plugin instance.
    pub fn same_instance(&self, other: &PluginHandle) -> bool {
        Arc::ptr_eq(&self.plugin, &other.plugin)
    }
}

impl fmt::Debug for PluginHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginHandle")
            .field("package_name", &self.plugin.package_name())
            .field("name", &self.plugin.name())
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Type-level capability marker used for typed registry retrieval.
pub trait Capability: sealed::Sealed + 'static {
    /// The trait object this capability narrows to.
    type Object: ?Sized + Send + Sync + 'static;

    const KIND: CapabilityKind;

    fn narrow(handle: &PluginHandle) -> Option<Arc<Self::Object>>;
}

/// Marker for the base [`Plugin`] contract.
pub enum GenericCapability {}

/// Marker for the [`Deployer`] contract.
pub enum DeployerCapability {}

/// Marker for the [`Provider`] contract.
pub enum ProviderCapability {}

impl sealed::Sealed for GenericCapability {}
impl sealed::Sealed for DeployerCapability {}
impl sealed::Sealed for ProviderCapability {}

impl Capability for GenericCapability {
    type Object = dyn Plugin;
    const KIND: CapabilityKind = CapabilityKind::Generic;

    fn narrow(handle: &PluginHandle) -> Option<Arc<dyn Plugin>> {
        Some(handle.plugin.clone())
    }
}

impl Capability for DeployerCapability {
    type Object = dyn Deployer;
    const KIND: CapabilityKind = CapabilityKind::Deployer;

    fn narrow(handle: &PluginHandle) -> Option<Arc<dyn Deployer>> {
        handle.as_deployer()
    }
}

impl Capability for ProviderCapability {
    type Object = dyn Provider;
    const KIND: CapabilityKind = CapabilityKind::Provider;

    fn narrow(handle: &PluginHandle) -> Option<Arc<dyn Provider>> {
        handle.as_provider()
    }
}
