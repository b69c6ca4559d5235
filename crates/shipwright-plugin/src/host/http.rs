// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`HttpClient`] over `reqwest`.
//!
//! Relative request URLs are resolved against an optional base URL. Non-2xx
//! responses are returned as responses, not errors; callers inspect
//! [`HttpResponse::is_success`]. No retries.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use shipwright_core::traits::{HttpMethod, HttpRequest, HttpResponse};
use shipwright_core::{HttpClient, ShipwrightError};
use tracing::debug;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for [`ReqwestHttpClient`].
#[derive(Debug, Clone)]
pub struct ReqwestHttpClientBuilder {
    base_url: Option<String>,
    headers: BTreeMap<String, String>,
    timeout: Duration,
}

impl ReqwestHttpClientBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// A header sent with every request.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<ReqwestHttpClient, ShipwrightError> {
        let headers = header_map(&self.headers)
            .map_err(|e| ShipwrightError::Config(format!("invalid default header: {e}")))?;

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()
            .map_err(|e| ShipwrightError::Http {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(ReqwestHttpClient {
            client,
            base_url: self.base_url.map(|u| u.trim_end_matches('/').to_string()),
        })
    }
}

/// The host's HTTP client, handed to providers during OAuth callbacks.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl ReqwestHttpClient {
    pub fn builder() -> ReqwestHttpClientBuilder {
        ReqwestHttpClientBuilder {
            base_url: None,
            headers: BTreeMap::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// A client with no base URL and the default timeout.
    pub fn new() -> Result<Self, ShipwrightError> {
        Self::builder().build()
    }

    fn resolve(&self, url: &str) -> Result<String, ShipwrightError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Ok(url.to_string());
        }
        match &self.base_url {
            Some(base) => Ok(format!("{base}/{}", url.trim_start_matches('/'))),
            None => Err(ShipwrightError::http(format!(
                "relative URL `{url}` with no base URL configured"
            ))),
        }
    }
}

fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, String> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| format!("{name}: {e}"))?;
        let value = HeaderValue::from_str(value).map_err(|e| format!("{name}: {e}"))?;
        map.insert(name, value);
    }
    Ok(map)
}

fn method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ShipwrightError> {
        let url = self.resolve(&request.url)?;
        let headers = header_map(&request.headers)
            .map_err(|e| ShipwrightError::http(format!("invalid request header: {e}")))?;

        let mut builder = self
            .client
            .request(method(request.method), &url)
            .headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| ShipwrightError::Http {
            message: format!("{} {url} failed: {e}", request.method),
            source: Some(Box::new(e)),
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response.text().await.map_err(|e| ShipwrightError::Http {
            message: format!("failed to read response body from {url}: {e}"),
            source: Some(Box::new(e)),
        })?;

        debug!(method = %request.method, url = %url, status, "http request completed");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method as http_method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn get_resolves_against_base_url_with_default_headers() {
        let server = MockServer::start().await;
        Mock::given(http_method("GET"))
            .and(path("/repos/acme/api/releases"))
            .and(header("authorization", "Bearer t0k"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-ratelimit-remaining", "59")
                    .set_body_string(r#"[{"name":"v1.0.0"}]"#),
            )
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::builder()
            .base_url(format!("{}/", server.uri()))
            .default_header("authorization", "Bearer t0k")
            .build()
            .unwrap();

        let response = client.get("/repos/acme/api/releases").await.unwrap();
        assert!(response.is_success());
        assert_eq!(response.headers["x-ratelimit-remaining"], "59");
        let releases: Vec<BTreeMap<String, String>> = response.json().unwrap();
        assert_eq!(releases[0]["name"], "v1.0.0");
    }

    #[tokio::test]
    async fn post_sends_body_and_request_headers() {
        let server = MockServer::start().await;
        Mock::given(http_method("POST"))
            .and(path("/login/oauth/access_token"))
            .and(header("accept", "application/json"))
            .and(body_string("code=abc"))
            .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"access_token":"xyz"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new().unwrap();
        let request = HttpRequest::new(
            HttpMethod::Post,
            format!("{}/login/oauth/access_token", server.uri()),
        )
        .header("accept", "application/json")
        .body("code=abc");

        let response = client.send(request).await.unwrap();
        assert_eq!(response.status, 201);
        assert!(response.body.contains("xyz"));
    }

    #[tokio::test]
    async fn error_status_is_returned_not_raised() {
        let server = MockServer::start().await;
        Mock::given(http_method("DELETE"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::builder()
            .base_url(server.uri())
            .build()
            .unwrap();
        let response = client.delete("deployments/7").await.unwrap();
        assert_eq!(response.status, 404);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn relative_url_without_base_is_an_error() {
        let client = ReqwestHttpClient::new().unwrap();
        let err = client.get("/releases").await.unwrap_err();
        assert!(matches!(err, ShipwrightError::Http { .. }));
    }

    #[test]
    fn invalid_default_header_is_config_error() {
        let err = ReqwestHttpClient::builder()
            .default_header("bad header", "x")
            .build()
            .unwrap_err();
        assert!(matches!(err, ShipwrightError::Config(_)));
    }
}
