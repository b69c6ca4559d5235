// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider contract for source-control and release hosts (GitHub, GitLab, etc.).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ShipwrightError;
use crate::traits::http::HttpClient;
use crate::traits::plugin::Plugin;
use crate::types::{Deployment, PullRequest, Release};

/// Data handed to a provider when the OAuth redirect comes back.
#[derive(Clone)]
pub struct OauthCallbackContext {
    /// Authorization code from the callback request.
    pub code: String,
    /// Client the provider uses to exchange the code.
    pub http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for OauthCallbackContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OauthCallbackContext")
            .field("code", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Adapter for git providers.
#[async_trait]
pub trait Provider: Plugin {
    /// Whether the provider supports an OAuth connection flow.
    fn is_oauth_capable(&self) -> bool;

    /// Builds the URL the user visits to grant access.
    async fn oauth_connection_url(
        &self,
        params: HashMap<String, String>,
    ) -> Result<String, ShipwrightError>;

    /// Exchanges the callback code and returns the values the host should
    /// persist (tokens, account identifiers).
    async fn handle_oauth_callback(
        &self,
        ctx: OauthCallbackContext,
    ) -> Result<HashMap<String, String>, ShipwrightError>;

    async fn list_releases(&self) -> Result<Vec<Release>, ShipwrightError>;

    async fn release_by_tag(&self, tag: &str) -> Result<Release, ShipwrightError>;

    /// Creates a deployment record for `git_ref`.
    async fn create_deployment(&self, git_ref: &str) -> Result<Deployment, ShipwrightError>;

    async fn update_deployment_status(
        &self,
        id: i64,
        state: &str,
        environment_url: &str,
    ) -> Result<Deployment, ShipwrightError>;

    async fn pull_request(&self, number: u64) -> Result<PullRequest, ShipwrightError>;
}
