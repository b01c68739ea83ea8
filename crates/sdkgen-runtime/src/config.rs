//! Client configuration, following the teacher's plain-struct-with-
//! `from_env`/builder-methods config style
//! (`ruststack-core::config::RustStackConfig`), generalized from a fixed
//! gateway-listen/persistence shape to the fields a generated client's
//! endpoint resolver and signer actually need.

use crate::credentials::Credentials;

/// Configuration an embedding application builds once and passes to a
/// generated client's `init`.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// AWS region, e.g. `"us-east-1"`.
    pub region: Option<String>,
    /// Static credentials. `None` means the generated client can't sign
    /// requests requiring `aws.auth#sigv4`.
    pub credentials: Option<Credentials>,
    /// Override the resolved endpoint entirely.
    pub endpoint_url: Option<String>,
    /// Prefer dual-stack endpoints where the service supports them.
    pub use_dual_stack: Option<bool>,
    /// Prefer FIPS endpoints where the service supports them.
    pub use_fips: Option<bool>,
}

impl Config {
    /// An empty configuration; every field falls back to the rule set's
    /// default at endpoint-resolution time.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from the conventional `AWS_*` environment
    /// variables, leaving unset fields at their default.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = std::env::var("AWS_REGION") {
            config.region = Some(v);
        }
        if let (Ok(key), Ok(secret)) = (std::env::var("AWS_ACCESS_KEY_ID"), std::env::var("AWS_SECRET_ACCESS_KEY")) {
            let mut creds = Credentials::new(key, secret);
            if let Ok(token) = std::env::var("AWS_SESSION_TOKEN") {
                creds = creds.with_session_token(token);
            }
            config.credentials = Some(creds);
        }
        if let Ok(v) = std::env::var("AWS_ENDPOINT_URL") {
            config.endpoint_url = Some(v);
        }
        config
    }

    /// Set the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Override the resolved endpoint.
    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_methods_set_fields() {
        let config = Config::new().with_region("us-west-2").with_endpoint_url("https://example.com");
        assert_eq!(config.region.as_deref(), Some("us-west-2"));
        assert_eq!(config.endpoint_url.as_deref(), Some("https://example.com"));
        assert!(config.credentials.is_none());
    }
}
