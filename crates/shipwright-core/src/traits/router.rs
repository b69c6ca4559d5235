// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing collaborator a plugin uses to mount HTTP handlers on the host.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::ShipwrightError;

/// Request/response surface exposed to a handler.
///
/// JSON bodies are passed as serialized text so no serializer state crosses
/// the module boundary.
pub trait RequestContext: Send {
    /// Writes a JSON response.
    fn json(&mut self, status: u16, body: String) -> Result<(), ShipwrightError>;

    /// Writes a plain-text response.
    fn text(&mut self, status: u16, body: String) -> Result<(), ShipwrightError>;

    /// Returns a query-string parameter.
    fn query(&self, key: &str) -> Option<String>;

    /// Returns a path parameter.
    fn param(&self, key: &str) -> Option<String>;
}

/// Future returned by a [`Handler`].
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<(), ShipwrightError>> + Send>>;

/// An HTTP handler mounted through a [`Router`].
pub type Handler = Arc<dyn Fn(Box<dyn RequestContext>) -> HandlerFuture + Send + Sync>;

/// Wraps an async closure into a [`Handler`].
pub fn handler<F, Fut>(f: F) -> Handler
where
    F: Fn(Box<dyn RequestContext>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ShipwrightError>> + Send + 'static,
{
    Arc::new(move |ctx| Box::pin(f(ctx)))
}

/// Registers handlers on the host's HTTP server.
pub trait Router: Send + Sync {
    fn get(&self, path: &str, handler: Handler);

    fn post(&self, path: &str, handler: Handler);

    fn put(&self, path: &str, handler: Handler);

    fn delete(&self, path: &str, handler: Handler);

    /// Returns a router whose routes are mounted under `prefix`.
    fn group(&self, prefix: &str) -> Arc<dyn Router>;
}
