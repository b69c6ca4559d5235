// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-kind plugin stores behind one lock.
//!
//! The `PluginRegistry` keeps a map of plugin identifier to [`PluginHandle`]
//! for every [`CapabilityKind`]. Hosts either create their own registry with
//! [`PluginRegistry::new`] and pass it around, or use the process-wide one
//! set up by [`init_registry`].

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use shipwright_core::{
    Capability, CapabilityKind, Deployer, DeployerCapability, GenericCapability,
    IdentifierSource, Plugin, PluginHandle, Provider, ProviderCapability, ShipwrightError,
};

type Store = HashMap<String, PluginHandle>;

/// Registry of loaded plugins, one store per capability kind.
pub struct PluginRegistry {
    stores: RwLock<HashMap<CapabilityKind, Store>>,
}

impl PluginRegistry {
    /// Create a registry with an empty store for every kind.
    pub fn new() -> Self {
        let stores = CapabilityKind::ALL
            .into_iter()
            .map(|kind| (kind, Store::new()))
            .collect();
        Self {
            stores: RwLock::new(stores),
        }
    }

    // A panic while holding the lock cannot leave a store half-written: the
    // only mutation is a single insert.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<CapabilityKind, Store>> {
        self.stores.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CapabilityKind, Store>> {
        self.stores.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `handle` under `kind`, returning the identifier it was stored as.
    ///
    /// The capability check, identifier derivation and insert happen under
    /// one write lock, so two racing registrations of the same identifier
    /// cannot both succeed.
    pub fn register<F>(
        &self,
        kind: CapabilityKind,
        handle: PluginHandle,
        identifier_of: F,
    ) -> Result<String, ShipwrightError>
    where
        F: FnOnce(&dyn Plugin) -> String,
    {
        let mut stores = self.write();

        if !handle.satisfies(kind) {
            return Err(ShipwrightError::CapabilityMismatch {
                subject: format!("plugin `{}`", handle.plugin().package_name()),
                expected: kind,
            });
        }

        let id = identifier_of(handle.plugin().as_ref());
        let store = stores.entry(kind).or_default();
        if store.contains_key(&id) {
            return Err(ShipwrightError::AlreadyRegistered { kind, id });
        }
        store.insert(id.clone(), handle);
        Ok(id)
    }

    pub fn get_by_identifier(
        &self,
        kind: CapabilityKind,
        id: &str,
    ) -> Result<PluginHandle, ShipwrightError> {
        self.read()
            .get(&kind)
            .and_then(|store| store.get(id))
            .cloned()
            .ok_or_else(|| ShipwrightError::NotFound {
                kind,
                id: id.to_string(),
            })
    }

    /// Every plugin registered under `kind`, in no particular order.
    pub fn get_all_of_kind(&self, kind: CapabilityKind) -> Vec<PluginHandle> {
        self.read()
            .get(&kind)
            .map(|store| store.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Typed lookup through the capability marker `C`.
    pub fn get<C: Capability>(&self, id: &str) -> Result<Arc<C::Object>, ShipwrightError> {
        self.get_by_identifier(C::KIND, id)?.narrow::<C>()
    }

    /// Typed listing through the capability marker `C`.
    pub fn all<C: Capability>(&self) -> Vec<Arc<C::Object>> {
        self.get_all_of_kind(C::KIND)
            .iter()
            .filter_map(C::narrow)
            .collect()
    }

    pub fn plugin(&self, id: &str) -> Result<Arc<dyn Plugin>, ShipwrightError> {
        self.get::<GenericCapability>(id)
    }

    pub fn plugins(&self) -> Vec<Arc<dyn Plugin>> {
        self.all::<GenericCapability>()
    }

    pub fn deployer(&self, id: &str) -> Result<Arc<dyn Deployer>, ShipwrightError> {
        self.get::<DeployerCapability>(id)
    }

    pub fn deployers(&self) -> Vec<Arc<dyn Deployer>> {
        self.all::<DeployerCapability>()
    }

    pub fn provider(&self, id: &str) -> Result<Arc<dyn Provider>, ShipwrightError> {
        self.get::<ProviderCapability>(id)
    }

    pub fn providers(&self) -> Vec<Arc<dyn Provider>> {
        self.all::<ProviderCapability>()
    }

    /// Identifiers registered under `kind`, sorted.
    pub fn identifiers(&self, kind: CapabilityKind) -> Vec<String> {
        let mut ids: Vec<String> = self
            .read()
            .get(&kind)
            .map(|store| store.keys().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    pub fn len(&self, kind: CapabilityKind) -> usize {
        self.read().get(&kind).map_or(0, Store::len)
    }

    /// True when no kind has any registered plugin.
    pub fn is_empty(&self) -> bool {
        self.read().values().all(Store::is_empty)
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stores = self.read();
        let mut map = f.debug_map();
        for kind in CapabilityKind::ALL {
            let mut ids: Vec<&String> = stores.get(&kind).map(|s| s.keys().collect()).unwrap_or_default();
            ids.sort();
            map.entry(&kind, &ids);
        }
        map.finish()
    }
}

/// The identifier a plugin is registered under for the given source.
pub fn identifier_of(source: IdentifierSource, plugin: &dyn Plugin) -> String {
    match source {
        IdentifierSource::PackageName => plugin.package_name().to_string(),
        IdentifierSource::Name => plugin.name().to_string(),
    }
}

static GLOBAL: OnceLock<Arc<PluginRegistry>> = OnceLock::new();

/// Create the process-wide registry. Fails if it already exists.
pub fn init_registry() -> Result<Arc<PluginRegistry>, ShipwrightError> {
    let registry = Arc::new(PluginRegistry::new());
    GLOBAL
        .set(registry.clone())
        .map_err(|_| ShipwrightError::RegistryAlreadyInitialized)?;
    Ok(registry)
}

/// The process-wide registry created by [`init_registry`].
pub fn registry() -> Result<Arc<PluginRegistry>, ShipwrightError> {
    GLOBAL.get().cloned().ok_or(ShipwrightError::RegistryUninitialized)
}
