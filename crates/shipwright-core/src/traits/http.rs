// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client collaborator handed to providers during OAuth callbacks.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use strum::{Display, EnumString};

use crate::error::ShipwrightError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// An outbound request. `url` may be relative to the client's base URL.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    /// Serialized JSON body.
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A buffered response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ShipwrightError> {
        serde_json::from_str(&self.body).map_err(|e| ShipwrightError::Http {
            message: format!("invalid JSON response body: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

/// HTTP client provided by the host.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends a request and buffers the response. Non-2xx statuses are
    /// returned as responses, not errors.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ShipwrightError>;

    async fn get(&self, url: &str) -> Result<HttpResponse, ShipwrightError> {
        self.send(HttpRequest::new(HttpMethod::Get, url)).await
    }

    async fn post(&self, url: &str, body: String) -> Result<HttpResponse, ShipwrightError> {
        self.send(HttpRequest::new(HttpMethod::Post, url).body(body))
            .await
    }

    async fn put(&self, url: &str, body: String) -> Result<HttpResponse, ShipwrightError> {
        self.send(HttpRequest::new(HttpMethod::Put, url).body(body))
            .await
    }

    async fn delete(&self, url: &str) -> Result<HttpResponse, ShipwrightError> {
        self.send(HttpRequest::new(HttpMethod::Delete, url)).await
    }
}
