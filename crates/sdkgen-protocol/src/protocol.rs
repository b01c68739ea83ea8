//! Protocol tag detection from a service's protocol traits.

use sdkgen_model::ShapeId;
use sdkgen_symbols::SymbolTable;

use crate::error::{ProtocolError, ProtocolResult};

/// One of the wire protocols a service may declare via
/// `aws.protocols#*` traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// `aws.protocols#restJson1`.
    RestJson1,
    /// `aws.protocols#awsJson1_0`.
    AwsJson1_0,
    /// `aws.protocols#awsJson1_1`.
    AwsJson1_1,
    /// `aws.protocols#restXml`.
    RestXml,
    /// `aws.protocols#ec2Query`.
    Ec2Query,
    /// `aws.protocols#awsQuery`.
    AwsQuery,
}

impl Protocol {
    /// True for the two protocols this crate binds fully (spec's Open
    /// Questions call out `restJson1`/`awsJson1_0` as the ones to fully
    /// work out; the others get the shared URI/label/query/header
    /// machinery plus a body-codec seam, per [`crate::body::BodyCodec`]).
    #[must_use]
    pub fn is_fully_bound(self) -> bool {
        matches!(self, Protocol::RestJson1 | Protocol::AwsJson1_0)
    }

    /// The default HTTP method for operations that don't declare an
    /// explicit `@http` trait (the RPC-style JSON/query protocols always
    /// POST to `/`).
    #[must_use]
    pub fn default_method(self) -> &'static str {
        match self {
            Protocol::RestJson1 | Protocol::RestXml => "GET",
            Protocol::AwsJson1_0 | Protocol::AwsJson1_1 | Protocol::Ec2Query | Protocol::AwsQuery => "POST",
        }
    }
}

/// Resolve a service's protocol from its traits.
///
/// # Errors
/// [`ProtocolError::UnknownProtocol`] if the service carries none of the
/// recognized `aws.protocols#*` traits.
pub fn detect_protocol(symbols: &SymbolTable<'_>, service: ShapeId) -> ProtocolResult<Protocol> {
    let candidates = [
        ("aws.protocols#restJson1", Protocol::RestJson1),
        ("aws.protocols#awsJson1_0", Protocol::AwsJson1_0),
        ("aws.protocols#awsJson1_1", Protocol::AwsJson1_1),
        ("aws.protocols#restXml", Protocol::RestXml),
        ("aws.protocols#ec2Query", Protocol::Ec2Query),
        ("aws.protocols#awsQuery", Protocol::AwsQuery),
    ];
    for (trait_name, protocol) in candidates {
        if symbols.has_trait(service, ShapeId::of(trait_name)) {
            return Ok(protocol);
        }
    }
    Err(ProtocolError::UnknownProtocol(service))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_json1_defaults_to_get() {
        assert_eq!(Protocol::RestJson1.default_method(), "GET");
        assert!(Protocol::RestJson1.is_fully_bound());
    }

    #[test]
    fn rest_xml_is_not_fully_bound() {
        assert!(!Protocol::RestXml.is_fully_bound());
        assert_eq!(Protocol::RestXml.default_method(), "GET");
    }
}
