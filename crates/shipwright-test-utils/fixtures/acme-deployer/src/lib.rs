// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Acme deployment backend, packaged as a Shipwright plugin module.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shipwright_core::traits::{handler, DeployContext, RequestContext};
use shipwright_core::types::{
    AffectedRevision, DeployOutcome, DeploymentStatus, FieldType, RunningService,
};
use shipwright_core::{
    ConfigField, Deployer, HostLogger, Plugin, PluginConfig, PluginHandle, Router,
    ShipwrightError,
};

#[derive(Default)]
struct AcmeDeployer {
    region: Mutex<Option<String>>,
    logger: Mutex<Option<Arc<dyn HostLogger>>>,
    services: Mutex<Vec<RunningService>>,
}

impl AcmeDeployer {
    fn log(&self, msg: &str) {
        if let Some(logger) = self.logger.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
            logger.info(msg);
        }
    }
}

#[async_trait]
impl Plugin for AcmeDeployer {
    fn package_name(&self) -> &str {
        "acme-deployer"
    }

    fn name(&self) -> &str {
        "Acme Deployer"
    }

    async fn init(
        &self,
        config: PluginConfig,
        router: Arc<dyn Router>,
        logger: Arc<dyn HostLogger>,
    ) -> Result<(), ShipwrightError> {
        let region = config
            .get("region")
            .cloned()
            .ok_or_else(|| ShipwrightError::Config("region is required".to_string()))?;
        router.get(
            "/health",
            handler(|mut ctx: Box<dyn RequestContext>| async move {
                ctx.json(200, r#"{"healthy":true}"#.to_string())
            }),
        );
        logger.info(&format!("acme deployer ready in {region}"));
        *self.region.lock().unwrap_or_else(|e| e.into_inner()) = Some(region);
        *self.logger.lock().unwrap_or_else(|e| e.into_inner()) = Some(logger);
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), ShipwrightError> {
        self.log("acme deployer stopping");
        Ok(())
    }

    fn version(&self) -> &str {
        "1.4.0"
    }

    fn description(&self) -> &str {
        "Deploys container images to the Acme cloud"
    }

    fn config_fields(&self) -> Vec<ConfigField> {
        vec![
            ConfigField::new("token", "API Token", FieldType::Password)
                .required()
                .with_help("Token with deploy scope"),
            ConfigField::new("region", "Region", FieldType::Select)
                .with_options(["eu-west-1", "us-east-1"])
                .with_default("eu-west-1"),
        ]
    }
}

#[async_trait]
impl Deployer for AcmeDeployer {
    async fn deploy(&self, ctx: DeployContext) -> Result<DeployOutcome, ShipwrightError> {
        ctx.status.report(DeploymentStatus::Pending);
        let region = self
            .region
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or_else(|| ShipwrightError::plugin("deploy called before init"))?;
        ctx.status.report(DeploymentStatus::Progress);

        let mut services = self.services.lock().unwrap_or_else(|e| e.into_inner());
        services.retain(|s| s.name != ctx.service);
        services.push(RunningService {
            name: ctx.service.clone(),
            image: ctx.image.clone(),
            status: "running".to_string(),
        });
        drop(services);

        self.log(&format!("deployed {} to {region}", ctx.image));
        ctx.status.report(DeploymentStatus::Success);
        Ok(DeployOutcome {
            revision_url: Some(format!(
                "https://console.acme.example/{region}/{}",
                ctx.service
            )),
        })
    }

    async fn running_services(&self) -> Result<Vec<RunningService>, ShipwrightError> {
        Ok(self
            .services
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }

    async fn affected_revisions(
        &self,
        service: &str,
    ) -> Result<Vec<AffectedRevision>, ShipwrightError> {
        let services = self.services.lock().unwrap_or_else(|e| e.into_inner());
        Ok(services
            .iter()
            .filter(|s| s.name == service)
            .map(|s| AffectedRevision {
                service: s.name.clone(),
                created_at: "2026-01-01T00:00:00Z".to_string(),
            })
            .collect())
    }
}

fn build() -> PluginHandle {
    PluginHandle::deployer(Arc::new(AcmeDeployer::default()))
}

shipwright_core::export_plugin!(build);
