//! The HTTP collaborator behind every signed request.
//!
//! Connection handling, TLS, timeouts and retries belong to the transport; the
//! signing layer hands it one finished [`http::Request`] at a time and waits
//! for the response.

use std::{fmt, sync::Arc};

use reqwest::blocking::Client as ReqwestClient;

use crate::TransportResult;

/// Blocking HTTP transport.
pub trait Transport: Send + Sync {
    fn execute(&self, request: http::Request<String>) -> TransportResult<http::Response<String>>;
}

impl<F> Transport for F
where
    F: Fn(http::Request<String>) -> TransportResult<http::Response<String>> + Send + Sync,
{
    fn execute(&self, request: http::Request<String>) -> TransportResult<http::Response<String>> {
        self(request)
    }
}

/// Default transport backed by `reqwest::blocking::Client`.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    inner: ReqwestClient,
}

impl ReqwestTransport {
    /// This method calls reqwest::blocking::Client::new() internally.
    pub fn new() -> Self {
        Default::default()
    }

    /// Constructs a new `ReqwestTransport` with specifying inner `reqwest::blocking::Client`.
    pub fn with_client(client: ReqwestClient) -> Self {
        ReqwestTransport { inner: client }
    }
}

impl From<ReqwestClient> for ReqwestTransport {
    fn from(client: ReqwestClient) -> Self {
        ReqwestTransport::with_client(client)
    }
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport").finish()
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: http::Request<String>) -> TransportResult<http::Response<String>> {
        let (parts, body) = request.into_parts();
        let response = self
            .inner
            .request(parts.method, parts.uri.to_string())
            .headers(parts.headers)
            .body(body)
            .send()?;

        let status = response.status();
        let headers = response.headers().clone();
        let mut converted = http::Response::new(response.text()?);
        *converted.status_mut() = status;
        *converted.headers_mut() = headers;
        Ok(converted)
    }
}

/// Fresh default transport. Nothing is shared with transports handed out earlier.
pub fn default_transport() -> Arc<dyn Transport> {
    Arc::new(ReqwestTransport::new())
}
