// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide registry. Kept in its own test binary so no other test
//! initializes it first.

use std::sync::Arc;

use shipwright_core::{CapabilityKind, PluginHandle, ShipwrightError};
use shipwright_plugin::{init_registry, registry};
use shipwright_test_utils::MockDeployer;

#[test]
fn global_registry_bootstrap() {
    assert!(matches!(
        registry().unwrap_err(),
        ShipwrightError::RegistryUninitialized
    ));

    let created = init_registry().unwrap();
    assert!(created.is_empty());

    assert!(matches!(
        init_registry().unwrap_err(),
        ShipwrightError::RegistryAlreadyInitialized
    ));

    let fetched = registry().unwrap();
    assert!(Arc::ptr_eq(&created, &fetched));

    created
        .register(
            CapabilityKind::Deployer,
            PluginHandle::deployer(Arc::new(MockDeployer::new("acme-deployer"))),
            |p| p.package_name().to_string(),
        )
        .unwrap();
    assert_eq!(registry().unwrap().len(CapabilityKind::Deployer), 1);
}
