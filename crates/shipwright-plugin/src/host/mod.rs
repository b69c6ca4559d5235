// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host-side implementations of the collaborators handed to plugins.

pub mod http;
pub mod logger;

pub use http::{ReqwestHttpClient, ReqwestHttpClientBuilder};
pub use logger::TracingLogger;
