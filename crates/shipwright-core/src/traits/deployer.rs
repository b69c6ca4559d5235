// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deployer contract for deployment backends (container platforms, PaaS targets).

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ShipwrightError;
use crate::traits::plugin::Plugin;
use crate::types::{AffectedRevision, DeployOutcome, DeploymentStatus, RunningService};

/// Callback a deployer uses to stream status changes back to the host.
#[derive(Clone)]
pub struct StatusReporter(Arc<dyn Fn(DeploymentStatus) + Send + Sync>);

impl StatusReporter {
    pub fn new(report: impl Fn(DeploymentStatus) + Send + Sync + 'static) -> Self {
        Self(Arc::new(report))
    }

    /// A reporter that drops every update.
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    pub fn report(&self, status: DeploymentStatus) {
        (self.0)(status)
    }
}

impl fmt::Debug for StatusReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StatusReporter")
    }
}

/// Input to a single deployment.
#[derive(Debug, Clone)]
pub struct DeployContext {
    /// Service to deploy.
    pub service: String,
    /// Image reference to roll out.
    pub image: String,
    pub status: StatusReporter,
}

/// Adapter for deployment backends.
#[async_trait]
pub trait Deployer: Plugin {
    /// Deploys `ctx.image` to `ctx.service`, reporting progress through
    /// `ctx.status`.
    async fn deploy(&self, ctx: DeployContext) -> Result<DeployOutcome, ShipwrightError>;

    /// Lists the services currently running on the target.
    async fn running_services(&self) -> Result<Vec<RunningService>, ShipwrightError>;

    /// Lists deployments affected by revisions of `service`.
    async fn affected_revisions(
        &self,
        service: &str,
    ) -> Result<Vec<AffectedRevision>, ShipwrightError>;
}
