// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The symbol a plugin module exports and the macro that generates it.
//!
//! Plugin modules are `cdylib` crates compiled independently of the host.
//! They exchange Rust trait objects with the host, which is only sound when
//! both sides were built by the same compiler against the same contract. The
//! exported [`PluginDeclaration`] starts with a [`DeclarationHeader`] of
//! plain integers, then an [`AbiFingerprint`]. The loader reads the header
//! first, so a foreign symbol of the same name is rejected before any of its
//! bytes are treated as pointers.

use crate::capability::PluginHandle;

/// Default name of the exported declaration symbol.
pub const PLUGIN_SYMBOL: &str = "Plugin";

/// Version of the capability contracts in `traits`. Bumped on any
/// incompatible change to a contract signature or DTO.
pub const CONTRACT_VERSION: u32 = 1;

/// Marker at offset zero of every declaration: `SHPWRGHT` in little-endian.
pub const DECLARATION_MAGIC: u64 = u64::from_le_bytes(*b"SHPWRGHT");

/// Version of the [`PluginDeclaration`] layout itself.
pub const DECLARATION_LAYOUT: u32 = 1;

/// Fixed-size prefix of a declaration, made only of integers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclarationHeader {
    pub magic: u64,
    pub layout_version: u32,
}

impl DeclarationHeader {
    pub const CURRENT: DeclarationHeader = DeclarationHeader {
        magic: DECLARATION_MAGIC,
        layout_version: DECLARATION_LAYOUT,
    };

    /// Describes why `self` is not a header this host can read past.
    pub fn mismatch(&self) -> Option<String> {
        if self.magic != DECLARATION_MAGIC {
            return Some(format!(
                "symbol is not a shipwright plugin declaration (magic {:#018x})",
                self.magic
            ));
        }
        if self.layout_version != DECLARATION_LAYOUT {
            return Some(format!(
                "declaration layout mismatch: module={}, host={}",
                self.layout_version, DECLARATION_LAYOUT
            ));
        }
        None
    }
}

/// Toolchain and contract identity a module was built with.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbiFingerprint {
    pub contract_version: u32,
    pub core_version: &'static str,
    pub rustc_version: &'static str,
}

impl AbiFingerprint {
    /// The fingerprint of the code this crate was compiled into.
    pub const CURRENT: AbiFingerprint = AbiFingerprint {
        contract_version: CONTRACT_VERSION,
        core_version: env!("CARGO_PKG_VERSION"),
        rustc_version: env!("SHIPWRIGHT_RUSTC_VERSION"),
    };

    /// Describes the first field that differs from `expected`, if any.
    pub fn mismatch(&self, expected: &AbiFingerprint) -> Option<String> {
        if self.contract_version != expected.contract_version {
            return Some(format!(
                "contract version mismatch: module={}, host={}",
                self.contract_version, expected.contract_version
            ));
        }
        if self.core_version != expected.core_version {
            return Some(format!(
                "shipwright-core version mismatch: module={}, host={}",
                self.core_version, expected.core_version
            ));
        }
        if self.rustc_version != expected.rustc_version {
            return Some(format!(
                "compiler mismatch: module=`{}`, host=`{}`",
                self.rustc_version, expected.rustc_version
            ));
        }
        None
    }
}

/// The value behind a module's exported `Plugin` symbol.
#[repr(C)]
pub struct PluginDeclaration {
    pub header: DeclarationHeader,
    pub abi: AbiFingerprint,
    /// Returns the module's plugin instance. Repeated calls return the same
    /// instance.
    pub entry: fn() -> PluginHandle,
}

/// Exports a plugin from a `cdylib` crate.
///
/// Takes a constructor `fn() -> PluginHandle`. The constructor runs once,
/// the first time the host asks for the plugin; later loads of the same
/// module get the same instance.
///
/// ```ignore
/// fn build() -> shipwright_core::PluginHandle {
///     shipwright_core::PluginHandle::deployer(std::sync::Arc::new(AcmeDeployer::default()))
/// }
///
/// shipwright_core::export_plugin!(build);
/// ```
#[macro_export]
macro_rules! export_plugin {
    ($constructor:path) => {
        #[doc(hidden)]
        fn __shipwright_plugin_entry() -> $crate::capability::PluginHandle {
            static INSTANCE: ::std::sync::OnceLock<$crate::capability::PluginHandle> =
                ::std::sync::OnceLock::new();
            INSTANCE.get_or_init($constructor).clone()
        }

        #[allow(non_upper_case_globals)]
        #[unsafe(no_mangle)]
        pub static Plugin: $crate::declaration::PluginDeclaration =
            $crate::declaration::PluginDeclaration {
                header: $crate::declaration::DeclarationHeader::CURRENT,
                abi: $crate::declaration::AbiFingerprint::CURRENT,
                entry: __shipwright_plugin_entry,
            };
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_fingerprint_matches_itself() {
        assert!(AbiFingerprint::CURRENT.mismatch(&AbiFingerprint::CURRENT).is_none());
    }

    #[test]
    fn current_header_is_accepted() {
        assert!(DeclarationHeader::CURRENT.mismatch().is_none());
    }

    #[test]
    fn foreign_magic_is_rejected() {
        let header = DeclarationHeader {
            magic: 1,
            layout_version: DECLARATION_LAYOUT,
        };
        let reason = header.mismatch().unwrap();
        assert!(reason.contains("not a shipwright plugin declaration"), "{reason}");
    }

    #[test]
    fn newer_layout_is_rejected() {
        let header = DeclarationHeader {
            layout_version: DECLARATION_LAYOUT + 1,
            ..DeclarationHeader::CURRENT
        };
        let reason = header.mismatch().unwrap();
        assert!(reason.starts_with("declaration layout mismatch"), "{reason}");
    }

    #[test]
    fn header_leads_the_declaration() {
        assert_eq!(std::mem::offset_of!(PluginDeclaration, header), 0);
    }

    #[test]
    fn contract_version_mismatch_is_reported_first() {
        let module = AbiFingerprint {
            contract_version: CONTRACT_VERSION + 1,
            core_version: "0.0.0",
            rustc_version: "rustc 0.0.0",
        };
        let reason = module.mismatch(&AbiFingerprint::CURRENT).unwrap();
        assert!(reason.starts_with("contract version mismatch"));
    }

    #[test]
    fn compiler_mismatch_is_reported() {
        let module = AbiFingerprint {
            rustc_version: "rustc 1.0.0 (a59de6d0e 2015-05-13)",
            ..AbiFingerprint::CURRENT
        };
        let reason = module.mismatch(&AbiFingerprint::CURRENT).unwrap();
        assert!(reason.contains("compiler mismatch"));
        assert!(reason.contains("rustc 1.0.0"));
    }
}
