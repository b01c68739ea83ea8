//! AWS Signature Version 4 request signing.
//!
//! Where `ruststack-auth::canonical` *verifies* inbound requests against a
//! signature a client already computed, this crate runs the same
//! canonicalization the other direction: given a request's method, path,
//! query, headers, and body, it *constructs and signs* an outbound request
//! on behalf of generated client code. The percent-encoding rules,
//! canonical-header collapsing, and canonical-query sorting are the same
//! AWS SigV4 primitives either direction needs.

use std::collections::BTreeMap;

use hmac::{Hmac, KeyInit, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Characters SigV4 leaves unescaped in a canonical URI path segment.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Errors raised while signing a request.
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    /// An HMAC key of an unexpected length was supplied to the signing chain.
    #[error("invalid HMAC key length")]
    InvalidKeyLength,
}

/// Result alias for this crate.
pub type SignerResult<T> = Result<T, SignerError>;

/// The inputs a [`sign`] call needs: everything about the request except
/// the credentials, which are passed separately so they can be zeroized by
/// the caller independently of request construction.
#[derive(Debug, Clone)]
pub struct SigningRequest<'a> {
    /// HTTP method, e.g. `"GET"`.
    pub method: &'a str,
    /// Request path, not yet percent-encoded.
    pub uri: &'a str,
    /// Raw query string (`key=value&key2=value2`), not yet sorted.
    pub query: &'a str,
    /// Header name/value pairs to canonicalize and sign over.
    pub headers: &'a [(&'a str, &'a str)],
    /// The raw request body, hashed with SHA-256.
    pub payload: &'a [u8],
}

/// The AWS region and service code a signature is scoped to, plus the
/// signing timestamp.
#[derive(Debug, Clone, Copy)]
pub struct SigningScope<'a> {
    /// `YYYYMMDD`.
    pub date: &'a str,
    /// `YYYYMMDDTHHMMSSZ`.
    pub amz_date: &'a str,
    /// AWS region, e.g. `"us-east-1"`.
    pub region: &'a str,
    /// AWS service code, e.g. `"s3"`.
    pub service: &'a str,
}

/// A computed signature plus the canonical artifacts that produced it,
/// useful for debugging and for tests asserting exact intermediate values.
#[derive(Debug, Clone)]
pub struct Signature {
    /// The full newline-joined canonical request.
    pub canonical_request: String,
    /// `"AWS4-HMAC-SHA256\n" + ...`.
    pub string_to_sign: String,
    /// Hex-lowercase HMAC-SHA256 signature.
    pub hex_signature: String,
}

/// Derive the SigV4 signing key: `HMAC(HMAC(HMAC(HMAC("AWS4"+secret, date),
/// region), service), "aws4_request")`.
///
/// # Errors
/// [`SignerError::InvalidKeyLength`] only if `hmac`'s key-length invariant
/// is violated, which cannot happen for SHA-256's 32-byte keys in practice.
pub fn derive_signing_key(secret_access_key: &str, scope: SigningScope<'_>) -> SignerResult<[u8; 32]> {
    let k_secret = format!("AWS4{secret_access_key}");
    let k_date = hmac_sha256(k_secret.as_bytes(), scope.date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, scope.region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, scope.service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> SignerResult<[u8; 32]> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| SignerError::InvalidKeyLength)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().into())
}

/// Build the canonical request string per spec: method, canonical URI,
/// canonical query, canonical headers, signed-headers list, hex payload
/// hash — each newline-joined.
#[must_use]
pub fn canonical_request(req: &SigningRequest<'_>) -> String {
    let canonical_uri = canonical_uri(req.uri);
    let canonical_query = canonical_query_string(req.query);
    let (canonical_headers, signed_headers) = canonical_headers(req.headers);
    let payload_hash = hex::encode(Sha256::digest(req.payload));
    format!(
        "{}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}\n\n{signed_headers}\n{payload_hash}",
        req.method
    )
}

fn canonical_uri(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_owned();
    }
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, URI_ENCODE_SET).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn canonical_query_string(query: &str) -> String {
    if query.is_empty() {
        return String::new();
    }
    let mut params: Vec<(&str, &str)> = query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .collect();
    params.sort_unstable();
    params.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("&")
}

fn canonical_headers(headers: &[(&str, &str)]) -> (String, String) {
    let mut by_name: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers {
        by_name
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(collapse_whitespace(value.trim()));
    }
    let canonical = by_name
        .iter()
        .map(|(name, values)| format!("{name}:{}\n", values.join(",")))
        .collect::<Vec<_>>()
        .join("");
    let signed = by_name.keys().cloned().collect::<Vec<_>>().join(";");
    (canonical, signed)
}

fn collapse_whitespace(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut last_was_space = false;
    for c in value.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out
}

/// Build the string-to-sign: `"AWS4-HMAC-SHA256\n" + amz_date + "\n" +
/// date "/" region "/" service "/aws4_request\n" + hex(SHA-256(canonical))`.
#[must_use]
pub fn string_to_sign(scope: SigningScope<'_>, canonical_request: &str) -> String {
    let credential_scope = format!("{}/{}/{}/aws4_request", scope.date, scope.region, scope.service);
    let hashed = hex::encode(Sha256::digest(canonical_request.as_bytes()));
    format!("AWS4-HMAC-SHA256\n{}\n{credential_scope}\n{hashed}", scope.amz_date)
}

/// Compute a full SigV4 signature for a request.
///
/// # Errors
/// Propagates [`SignerError`] from the signing-key HMAC chain.
pub fn sign(req: &SigningRequest<'_>, scope: SigningScope<'_>, secret_access_key: &str) -> SignerResult<Signature> {
    let canonical_request = canonical_request(req);
    let to_sign = string_to_sign(scope, &canonical_request);
    let signing_key = derive_signing_key(secret_access_key, scope)?;
    let signature = hmac_sha256(&signing_key, to_sign.as_bytes())?;
    Ok(Signature {
        canonical_request,
        string_to_sign: to_sign,
        hex_signature: hex::encode(signature),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signing_key_matches_known_vector() {
        let scope = SigningScope {
            date: "20130708",
            amz_date: "20130708T220855Z",
            region: "us-east-1",
            service: "s3",
        };
        let key = derive_signing_key("secret", scope).unwrap();
        assert_eq!(
            key,
            [
                0x05, 0x44, 0x5e, 0x7d, 0x33, 0x2d, 0x16, 0x6e, 0x92, 0xeb, 0xff, 0xac, 0x4b, 0x4a, 0x7a, 0xed, 0x82,
                0x7f, 0x27, 0x01, 0xc3, 0xdc, 0xc1, 0x99, 0xf4, 0xf9, 0x8d, 0x94, 0xfd, 0x5e, 0x15, 0x45
            ]
        );
    }

    #[test]
    fn canonical_request_matches_known_vector() {
        let req = SigningRequest {
            method: "GET",
            uri: "/foo",
            query: "foo=%25bar&baz=%24qux",
            headers: &[("host", "s3.amazonaws.com"), ("x-amz-date", "20130708T220855Z")],
            payload: b"",
        };
        let got = canonical_request(&req);
        let expected = "GET\n/foo\nbaz=%24qux&foo=%25bar\nhost:s3.amazonaws.com\nx-amz-date:20130708T220855Z\n\nhost;x-amz-date\ne3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
        assert_eq!(got, expected);
    }

    #[test]
    fn signing_is_deterministic() {
        let req = SigningRequest {
            method: "GET",
            uri: "/foo",
            query: "",
            headers: &[("host", "s3.amazonaws.com")],
            payload: b"hello",
        };
        let scope = SigningScope {
            date: "20130708",
            amz_date: "20130708T220855Z",
            region: "us-east-1",
            service: "s3",
        };
        let a = sign(&req, scope, "secret").unwrap();
        let b = sign(&req, scope, "secret").unwrap();
        assert_eq!(a.hex_signature, b.hex_signature);
    }

    #[test]
    fn canonical_uri_normalizes_empty_path() {
        assert_eq!(canonical_uri(""), "/");
        assert_eq!(canonical_uri("/"), "/");
    }
}
