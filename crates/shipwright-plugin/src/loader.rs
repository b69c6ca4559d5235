// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Opening plugin modules and checking them against a capability contract.
//!
//! A module is a `cdylib` built with [`shipwright_core::export_plugin!`]. The
//! loader opens it, resolves the declaration symbol, checks the integer
//! header, compares the ABI fingerprint, and only then calls into the module. Nothing here touches a
//! registry.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use libloading::Library;
use shipwright_core::{
    AbiFingerprint, Capability, CapabilityKind, DeclarationHeader, PluginDeclaration,
    PluginHandle, ShipwrightError, PLUGIN_SYMBOL,
};
use tracing::debug;

/// Opens plugin modules and resolves their declaration symbol.
#[derive(Debug, Clone)]
pub struct ModuleLoader {
    symbol: String,
}

impl ModuleLoader {
    /// A loader resolving the default `Plugin` symbol.
    pub fn new() -> Self {
        Self::with_symbol(PLUGIN_SYMBOL)
    }

    pub fn with_symbol(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Open a module, resolve its declaration and verify the ABI fingerprint.
    ///
    /// The library is never unloaded: trait objects handed out by the module
    /// point into its code for the rest of the process.
    pub fn open(&self, path: &Path) -> Result<LoadedModule, ShipwrightError> {
        // SAFETY: opening a library runs its initializers. Modules are trusted
        // code placed in the plugin directory by the operator.
        let library = unsafe { Library::new(path) }.map_err(|e| ShipwrightError::ModuleOpen {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let library: &'static Library = Box::leak(Box::new(library));

        let missing = || ShipwrightError::SymbolNotFound {
            path: path.to_path_buf(),
            symbol: self.symbol.clone(),
        };
        // SAFETY: the lookup only yields the symbol's address; nothing is read
        // through it here.
        let ptr: *const PluginDeclaration = unsafe {
            let symbol = library
                .get::<*const PluginDeclaration>(self.symbol.as_bytes())
                .map_err(|_| missing())?;
            *symbol
        };
        if ptr.is_null() {
            return Err(missing());
        }

        // SAFETY: the header is two integers, so any readable bytes at the
        // symbol form a valid value. It is read unaligned because a foreign
        // symbol of the same name has no alignment guarantee.
        let header = unsafe { ptr.cast::<DeclarationHeader>().read_unaligned() };
        if let Some(reason) = header.mismatch() {
            return Err(ShipwrightError::ModuleOpen {
                path: path.to_path_buf(),
                reason,
            });
        }

        // SAFETY: the header identifies a declaration emitted by
        // `export_plugin!` with this host's layout, a properly aligned
        // `static` that lives as long as the leaked library.
        let declaration: &'static PluginDeclaration = unsafe { &*ptr };

        if let Some(reason) = declaration.abi.mismatch(&AbiFingerprint::CURRENT) {
            return Err(ShipwrightError::ModuleOpen {
                path: path.to_path_buf(),
                reason: format!("incompatible plugin ABI: {reason}"),
            });
        }

        debug!(path = %path.display(), symbol = %self.symbol, "opened plugin module");
        Ok(LoadedModule {
            path: path.to_path_buf(),
            declaration,
        })
    }

    /// Open a module and check that its plugin provides `kind`.
    pub fn load(&self, path: &Path, kind: CapabilityKind) -> Result<PluginHandle, ShipwrightError> {
        self.open(path)?.narrow(kind)
    }

    /// Open a module and narrow its plugin to the contract `C`.
    pub fn load_as<C: Capability>(&self, path: &Path) -> Result<Arc<C::Object>, ShipwrightError> {
        self.open(path)?.narrow_to::<C>()
    }
}

impl Default for ModuleLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// A module whose declaration passed the ABI check.
pub struct LoadedModule {
    path: PathBuf,
    declaration: &'static PluginDeclaration,
}

impl LoadedModule {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The fingerprint the module was built with.
    pub fn abi(&self) -> &AbiFingerprint {
        &self.declaration.abi
    }

    /// The module's plugin instance. Every call returns the same instance.
    pub fn handle(&self) -> PluginHandle {
        (self.declaration.entry)()
    }

    /// The plugin instance if it provides `kind`.
    pub fn narrow(&self, kind: CapabilityKind) -> Result<PluginHandle, ShipwrightError> {
        let handle = self.handle();
        if handle.satisfies(kind) {
            Ok(handle)
        } else {
            Err(ShipwrightError::CapabilityMismatch {
                subject: self.subject(&handle),
                expected: kind,
            })
        }
    }

    pub fn narrow_to<C: Capability>(&self) -> Result<Arc<C::Object>, ShipwrightError> {
        let handle = self.narrow(C::KIND)?;
        handle.narrow::<C>()
    }

    fn subject(&self, handle: &PluginHandle) -> String {
        format!(
            "plugin `{}` from {}",
            handle.plugin().package_name(),
            self.path.display()
        )
    }
}

impl fmt::Debug for LoadedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModule")
            .field("path", &self.path)
            .field("abi", &self.declaration.abi)
            .finish()
    }
}
