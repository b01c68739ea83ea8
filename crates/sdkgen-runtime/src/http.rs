//! The transport seam generated clients call through: [`HttpClient`] is a
//! thin synchronous trait object with no real networking of its own — the
//! embedding application supplies an implementation backed by whatever HTTP
//! stack it prefers. Generated operation methods build a [`ClientOperation`]
//! and hand it to the client's configured `HttpClient`.

use std::sync::Arc;

use crate::document::Document;
use crate::result::UnmodeledError;

/// A resolved endpoint: the base URL a request is sent against, plus any
/// endpoint-scoped headers the rules engine attached (e.g. a forced
/// `Host` override).
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// The resolved base URL, e.g. `"https://example.us-east-1.amazonaws.com"`.
    pub url: String,
    /// Headers the endpoint rules attached to every request against it.
    pub headers: Vec<(String, String)>,
}

impl Endpoint {
    /// Wrap a bare URL with no extra headers.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), headers: Vec::new() }
    }
}

/// One fully-bound request: method, path (endpoint already joined in),
/// headers, and a serialized body.
#[derive(Debug, Clone)]
pub struct ClientOperation {
    /// HTTP method, e.g. `"POST"`.
    pub method: String,
    /// The full request URL, endpoint and URI template already resolved.
    pub url: String,
    /// Request headers, including any the signer attached.
    pub headers: Vec<(String, String)>,
    /// The serialized request body, if the operation sends one.
    pub body: Vec<u8>,
}

impl ClientOperation {
    /// Start building a request against a resolved endpoint.
    #[must_use]
    pub fn init(method: impl Into<String>, endpoint: &Endpoint, path: &str) -> Self {
        let mut url = endpoint.url.clone();
        url.push_str(path);
        Self { method: method.into(), url, headers: endpoint.headers.clone(), body: Vec::new() }
    }

    /// Append a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a request body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }
}

/// The raw response a transport hands back, before protocol-specific
/// deserialization.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Vec<(String, String)>,
    /// Raw response body bytes.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Parse the body as a JSON [`Document`], for protocols that report
    /// error details as JSON regardless of success/failure.
    ///
    /// # Errors
    /// Propagates `serde_json`'s parse error if the body isn't valid JSON.
    pub fn json_body(&self) -> serde_json::Result<Document> {
        serde_json::from_slice(&self.body)
    }
}

/// A transport a generated client dispatches requests through.
///
/// Implementations own retry, timeout, and connection-pooling policy;
/// this trait only describes the synchronous request/response exchange a
/// generated operation method needs.
pub trait HttpClient: std::fmt::Debug + Send + Sync {
    /// Send `operation` and return the raw response, or an
    /// [`UnmodeledError`] for failures the transport itself detects
    /// (connection refused, timeout, TLS failure) rather than ones the
    /// service reports in a response body.
    fn send_sync(&self, operation: ClientOperation) -> Result<RawResponse, UnmodeledError>;
}

/// An `HttpClient` for tests and documentation examples that records every
/// request it's handed and always returns a fixed response.
#[derive(Debug, Clone)]
pub struct StubHttpClient {
    response: RawResponse,
}

impl StubHttpClient {
    /// Build a stub that returns `response` for every call.
    #[must_use]
    pub fn new(response: RawResponse) -> Arc<Self> {
        Arc::new(Self { response })
    }
}

impl HttpClient for StubHttpClient {
    fn send_sync(&self, _operation: ClientOperation) -> Result<RawResponse, UnmodeledError> {
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_operation_joins_endpoint_and_path() {
        let endpoint = Endpoint::new("https://example.com");
        let op = ClientOperation::init("GET", &endpoint, "/widgets/1");
        assert_eq!(op.url, "https://example.com/widgets/1");
    }

    #[test]
    fn stub_http_client_echoes_the_fixed_response() {
        let stub = StubHttpClient::new(RawResponse { status: 200, headers: vec![], body: b"{}".to_vec() });
        let endpoint = Endpoint::new("https://example.com");
        let response = stub.send_sync(ClientOperation::init("GET", &endpoint, "/")).unwrap();
        assert_eq!(response.status, 200);
    }
}
