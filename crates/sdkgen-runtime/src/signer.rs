//! The generated-client-facing signer: wraps `sdkgen-signer`'s stateless
//! functions with the credentials and scope a `Config` already carries, and
//! renders the `Authorization` header value directly instead of leaving the
//! caller to assemble it from [`sdkgen_signer::Signature`]'s pieces.

use sdkgen_signer::{SignerResult, SigningRequest, SigningScope, sign};

use crate::credentials::Credentials;

/// Signs outbound requests for one service, in one region, with one set of
/// credentials.
#[derive(Debug, Clone)]
pub struct Signer {
    credentials: Credentials,
    region: String,
    service: String,
}

impl Signer {
    /// Build a signer scoped to `region`/`service` for the lifetime of
    /// `credentials`.
    #[must_use]
    pub fn new(credentials: Credentials, region: impl Into<String>, service: impl Into<String>) -> Self {
        Self { credentials, region: region.into(), service: service.into() }
    }

    /// Sign `request` at `date`/`amz_date` (caller-supplied so the signer
    /// stays free of wall-clock access, matching generated code's need to
    /// stamp the same timestamp onto the `X-Amz-Date` header it sends).
    ///
    /// Returns the `Authorization` header value; on `AWS4-HMAC-SHA256`
    /// temporary credentials, the caller must also send an
    /// `X-Amz-Security-Token` header with [`Credentials::session_token`].
    ///
    /// # Errors
    /// Propagates [`sdkgen_signer::SignerError`] from the underlying HMAC
    /// chain.
    pub fn authorization_header(&self, request: &SigningRequest<'_>, date: &str, amz_date: &str) -> SignerResult<String> {
        let scope = SigningScope { date, amz_date, region: &self.region, service: &self.service };
        let signature = sign(request, scope, &self.credentials.secret_access_key)?;
        let signed_headers = request.headers.iter().map(|(name, _)| name.to_lowercase()).collect::<Vec<_>>().join(";");
        Ok(format!(
            "AWS4-HMAC-SHA256 Credential={}/{date}/{}/{}/aws4_request, SignedHeaders={signed_headers}, Signature={}",
            self.credentials.access_key_id, self.region, self.service, signature.hex_signature
        ))
    }

    /// The session token to send as `X-Amz-Security-Token`, if the
    /// underlying credentials are temporary.
    #[must_use]
    pub fn session_token(&self) -> Option<&str> {
        self.credentials.session_token.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_an_authorization_header() {
        let signer = Signer::new(Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY"), "us-east-1", "service");
        let request = SigningRequest {
            method: "GET",
            uri: "/",
            query: "",
            headers: &[("host", "example.amazonaws.com"), ("x-amz-date", "20150830T123600Z")],
            payload: b"",
        };
        let header = signer.authorization_header(&request, "20150830", "20150830T123600Z").unwrap();
        assert!(header.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request"));
        assert!(header.contains("SignedHeaders=host;x-amz-date"));
    }
}
