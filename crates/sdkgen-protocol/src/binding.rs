//! Classifies an operation's input members into HTTP binding locations.
//!
//! Grounded in the teacher's `HttpBinding` enum (`Label`, `Query`,
//! `Header`, `Payload`, `PrefixHeaders`), generalized from a single
//! hardcoded S3 request shape to any structure's members via the symbols
//! provider.

use sdkgen_model::ShapeId;
use sdkgen_symbols::SymbolTable;

/// Where one member of an operation's input is bound on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpBinding {
    /// Substituted into a `{label}` in the URI template.
    Label,
    /// A query string parameter with this name.
    Query(String),
    /// An HTTP header with this name.
    Header(String),
    /// The entire HTTP payload body.
    Payload,
    /// Headers with this prefix, one per map entry.
    PrefixHeaders(String),
    /// Not bound to a fixed location; serialized into the protocol's
    /// default body format alongside its siblings.
    Body,
}

/// One member's resolved binding.
#[derive(Debug, Clone)]
pub struct MemberBinding {
    /// The member shape id.
    pub member: ShapeId,
    /// The member's Smithy (not Rust) name.
    pub name: String,
    /// Where it's bound.
    pub binding: HttpBinding,
}

/// Classify every member of `input_shape` into its `HttpBinding`.
///
/// # Errors
/// Propagates [`sdkgen_symbols::SymbolsError`] if `input_shape`'s mixin
/// chain is malformed.
pub fn classify_members(symbols: &SymbolTable<'_>, input_shape: ShapeId) -> sdkgen_symbols::SymbolsResult<Vec<MemberBinding>> {
    let label_id = ShapeId::of("smithy.api#httpLabel");
    let query_id = ShapeId::of("smithy.api#httpQuery");
    let header_id = ShapeId::of("smithy.api#httpHeader");
    let payload_id = ShapeId::of("smithy.api#httpPayload");
    let prefix_id = ShapeId::of("smithy.api#httpPrefixHeaders");

    let members = symbols.members(input_shape)?;
    let mut out = Vec::with_capacity(members.len());
    for &member in members.iter() {
        let name = symbols.get_name(member).unwrap_or_default().to_owned();
        let binding = if symbols.has_trait(member, label_id) {
            HttpBinding::Label
        } else if let Some(t) = symbols.get_trait(member, query_id) {
            HttpBinding::Query(t.downcast::<String>().cloned().unwrap_or_else(|| name.clone()))
        } else if let Some(t) = symbols.get_trait(member, header_id) {
            HttpBinding::Header(t.downcast::<String>().cloned().unwrap_or_else(|| name.clone()))
        } else if symbols.has_trait(member, payload_id) {
            HttpBinding::Payload
        } else if let Some(t) = symbols.get_trait(member, prefix_id) {
            HttpBinding::PrefixHeaders(t.downcast::<String>().cloned().unwrap_or_default())
        } else {
            HttpBinding::Body
        };
        out.push(MemberBinding { member, name, binding });
    }
    Ok(out)
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
    fn classifies_label_query_header_and_body_members() {
        let model = build(
            r#"{
                "smithy": "2.0",
                "shapes": {
                    "a#In": {
                        "type": "structure",
                        "members": {
                            "Bucket": { "target": "smithy.api#String", "traits": { "smithy.api#httpLabel": {} } },
                            "Prefix": { "target": "smithy.api#String", "traits": { "smithy.api#httpQuery": "prefix" } },
                            "Token": { "target": "smithy.api#String", "traits": { "smithy.api#httpHeader": "x-token" } },
                            "Body": { "target": "smithy.api#String" }
                        }
                    }
                }
            }"#,
        );
        let symbols = SymbolTable::new(&model);
        let input = ShapeId::of("a#In");
        let bindings = classify_members(&symbols, input).unwrap();
        assert_eq!(bindings.len(), 4);
        assert_eq!(bindings[0].binding, HttpBinding::Label);
        assert_eq!(bindings[1].binding, HttpBinding::Query("prefix".to_owned()));
        assert_eq!(bindings[2].binding, HttpBinding::Header("x-token".to_owned()));
        assert_eq!(bindings[3].binding, HttpBinding::Body);
    }
}
