// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability contracts and host collaborator traits.
//!
//! Capability traits extend [`Plugin`] and use `#[async_trait]` for dynamic
//! dispatch compatibility.

pub mod deployer;
pub mod http;
pub mod logger;
pub mod plugin;
pub mod provider;
pub mod router;

pub use deployer::{DeployContext, Deployer, StatusReporter};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use logger::HostLogger;
pub use plugin::Plugin;
pub use provider::{OauthCallbackContext, Provider};
pub use router::{handler, Handler, HandlerFuture, RequestContext, Router};
