//! The body-serialization seam for protocols beyond the two this crate
//! fully binds.
//!
//! [`crate::protocol::Protocol::is_fully_bound`] covers `restJson1` and
//! `awsJson1_0`/`awsJson1_1`-style services end to end (JSON bodies, via
//! the same hand-rolled reader [`sdkgen_model::json`] already provides).
//! `restXml`, `ec2Query`, and `awsQuery` need a payload codec this crate
//! doesn't implement; [`BodyCodec`] is the seam a later crate plugs into,
//! and [`unsupported_body_issue`] is how the pipeline records that a
//! service needed one without silently dropping the operation.

use sdkgen_model::{Issue, ShapeId};

use crate::protocol::Protocol;

/// Serializes and deserializes an operation's body for one protocol.
///
/// A JSON-bodied implementation can reuse [`sdkgen_model::json::JsonReader`]
/// directly; an XML or form-encoded one is intentionally left to a
/// dedicated crate rather than folding a second parser in here.
pub trait BodyCodec {
    /// The protocol this codec serializes for.
    fn protocol(&self) -> Protocol;

    /// Serialize `shape`'s bound-to-body members into a request payload.
    fn encode(&self, shape: ShapeId, fields: &[(&str, &str)]) -> Vec<u8>;

    /// Parse a response payload back into field name/value pairs.
    fn decode(&self, payload: &[u8]) -> Vec<(String, String)>;
}

/// Build the issue to record when `service` declared a protocol with no
/// body codec available yet, rather than emitting a client that silently
/// drops bodies.
#[must_use]
pub fn unsupported_body_issue(service: ShapeId, protocol: Protocol) -> Issue {
    Issue {
        shape: Some(service),
        message: format!(
            "service {service:?} uses {protocol:?}, which has no body codec implemented; \
             generated operations for it will bind URI/query/header members only"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_body_issue_names_the_protocol() {
        let issue = unsupported_body_issue(ShapeId::of("a#Svc"), Protocol::RestXml);
        assert!(issue.message.contains("RestXml"));
        assert_eq!(issue.shape, Some(ShapeId::of("a#Svc")));
    }
}
