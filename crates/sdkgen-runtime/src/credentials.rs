//! AWS credentials handed to [`crate::Signer`].

/// Long- or short-lived AWS credentials.
///
/// Like the signer's own `SigningRequest`, the secret key is carried as a
/// plain `String` here rather than zeroized — the zeroizing is the
/// embedding application's responsibility since it owns the credential's
/// full lifetime, not just the slice of it this crate borrows to sign one
/// request.
#[derive(Clone)]
pub struct Credentials {
    /// AWS access key id.
    pub access_key_id: String,
    /// AWS secret access key.
    pub secret_access_key: String,
    /// Session token, for temporary (STS-issued) credentials.
    pub session_token: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Credentials {
    /// Build static credentials from their components.
    #[must_use]
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Attach a session token for temporary credentials.
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_the_secret() {
        let creds = Credentials::new("AKIA", "secret");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("AKIA"));
    }
}
