//! Resolves one operation's full request shape: method, URI template, and
//! member bindings.

use sdkgen_model::{ShapeId, ShapeType};
use sdkgen_symbols::SymbolTable;

use crate::binding::{MemberBinding, classify_members};
use crate::error::{ProtocolError, ProtocolResult};
use crate::protocol::Protocol;
use crate::uri::UriTemplate;

/// The resolved request shape for one operation.
#[derive(Debug, Clone)]
pub struct OperationBinding {
    /// The HTTP method, e.g. `"GET"`.
    pub method: String,
    /// The parsed URI template (empty segments for RPC-style protocols).
    pub uri: UriTemplate,
    /// Every input member's binding, in declaration order.
    pub members: Vec<MemberBinding>,
}

impl OperationBinding {
    /// Labels this operation's URI template expects, by name.
    #[must_use]
    pub fn label_members(&self) -> Vec<&MemberBinding> {
        self.members
            .iter()
            .filter(|m| matches!(m.binding, crate::binding::HttpBinding::Label))
            .collect()
    }
}

/// Resolve the request shape for `operation` under `protocol`.
///
/// # Errors
/// [`ProtocolError::MissingHttpBinding`] if a rest-style protocol's
/// operation has no usable method, or [`ProtocolError::LabelMismatch`] if
/// the URI template and `@httpLabel` members disagree; also propagates
/// mixin-resolution errors as [`ProtocolError::UnknownShapeReference`].
pub fn bind_operation(symbols: &SymbolTable<'_>, protocol: Protocol, operation: ShapeId) -> ProtocolResult<OperationBinding> {
    let http_id = ShapeId::of("smithy.api#http");
    let http_trait = symbols.get_trait(operation, http_id).and_then(|t| t.downcast::<sdkgen_model::HttpTrait>());

    let (method, uri) = match http_trait {
        Some(h) => (h.method.clone(), UriTemplate::parse(&h.uri)),
        None if protocol.is_fully_bound() && matches!(protocol, Protocol::RestJson1 | Protocol::RestXml) => {
            return Err(ProtocolError::MissingHttpBinding(operation));
        }
        None => (protocol.default_method().to_owned(), UriTemplate::parse("/")),
    };

    let members = match symbols.get_shape(operation) {
        Some(ShapeType::Operation(meta)) => match meta.input {
            Some(input) => classify_members(symbols, input).map_err(|_| ProtocolError::UnknownShapeReference(input))?,
            None => Vec::new(),
        },
        _ => Vec::new(),
    };

    let uri_labels: Vec<&str> = uri.label_names();
    for label in &uri_labels {
        if !members.iter().any(|m| matches!(&m.binding, crate::binding::HttpBinding::Label) && m.name == *label) {
            return Err(ProtocolError::LabelMismatch {
                uri: format!("{uri:?}"),
                label: (*label).to_owned(),
            });
        }
    }

    Ok(OperationBinding { method, uri, members })
}

#[cfg(test)]
mod tests {
    use sdkgen_model::{IssuesBag, Policy, TraitRegistry, parse_model};

    use super::*;

    fn build(src: &str) -> sdkgen_model::ModelTables {
        let registry = TraitRegistry::with_builtins();
        let issues = IssuesBag::new();
        parse_model(src, &registry, &issues, Policy::Abort).unwrap()
    }

    #[test]
    fn binds_a_rest_json_operation() {
        let model = build(
            r#"{
                "smithy": "2.0",
                "shapes": {
                    "a#In": {
                        "type": "structure",
                        "members": {
                            "Bucket": { "target": "smithy.api#String", "traits": { "smithy.api#httpLabel": {} } }
                        }
                    },
                    "a#Op": {
                        "type": "operation",
                        "input": { "target": "a#In" },
                        "traits": { "smithy.api#http": { "method": "GET", "uri": "/{Bucket}", "code": 200 } }
                    }
                }
            }"#,
        );
        let symbols = SymbolTable::new(&model);
        let binding = bind_operation(&symbols, Protocol::RestJson1, ShapeId::of("a#Op")).unwrap();
        assert_eq!(binding.method, "GET");
        assert_eq!(binding.label_members().len(), 1);
    }

    #[test]
    fn rpc_protocols_default_to_post_root() {
        let model = build(
            r#"{
                "smithy": "2.0",
                "shapes": { "a#Op": { "type": "operation" } }
            }"#,
        );
        let symbols = SymbolTable::new(&model);
        let binding = bind_operation(&symbols, Protocol::AwsJson1_0, ShapeId::of("a#Op")).unwrap();
        assert_eq!(binding.method, "POST");
    }
}
