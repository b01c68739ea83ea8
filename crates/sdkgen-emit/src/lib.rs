//! Code emitter: produces declarative Rust source for a service's client,
//! shapes, errors, and endpoint resolver, plus a README.
//!
//! Generalizes the teacher's `codegen/src/codegen.rs` (`write!`/
//! `writeln!`-into-`String`, no templating engine, one `DO NOT EDIT`
//! header) from a single hardcoded S3 target into any service the
//! symbols provider can describe.

pub mod client;
pub mod doc;
pub mod endpoint;
pub mod error;
pub mod errors;
pub mod ident;
pub mod readme;
pub mod shapes;
pub mod types;

use std::collections::BTreeMap;

use sdkgen_model::ShapeType;
use sdkgen_symbols::SymbolTable;

pub use doc::html_to_markdown;
pub use error::{EmitError, EmitResult};

/// Emit every output file for one service: `client.zz`, `shapes.zz`,
/// `errors.zz`, `endpoint.zz`, and `README.md`, keyed by filename.
///
/// `model_src` is the original model document text, needed by
/// [`endpoint::generate_endpoint`] to recover the raw `endpointRuleSet`
/// JSON.
///
/// # Errors
/// [`EmitError::NoServiceShape`] if `service` isn't a service shape, or
/// any error the individual sub-emitters raise.
pub fn generate_service(symbols: &SymbolTable<'_>, service: sdkgen_model::ShapeId, model_src: &str) -> EmitResult<BTreeMap<String, String>> {
    let ShapeType::Service(_) = symbols.get_shape(service).ok_or(EmitError::NoServiceShape)? else {
        return Err(EmitError::NoServiceShape);
    };

    let mut roots: Vec<_> = symbols.errors_of(service);
    for operation in symbols.operations_of(service) {
        if let Some(ShapeType::Operation(meta)) = symbols.get_shape(operation) {
            roots.extend(meta.input);
            roots.extend(meta.output);
        }
    }

    let mut files = BTreeMap::new();
    files.insert("shapes.zz".to_owned(), shapes::generate_shapes(symbols, &roots)?);
    files.insert("errors.zz".to_owned(), errors::generate_errors(symbols, service)?);
    files.insert("client.zz".to_owned(), client::generate_client(symbols, service)?);
    files.insert("endpoint.zz".to_owned(), endpoint::generate_endpoint(symbols, service, model_src)?);
    files.insert("README.md".to_owned(), readme::generate_readme(symbols, service)?);
    Ok(files)
}

#[cfg(test)]
mod tests {
    use sdkgen_model::{IssuesBag, Policy, ShapeId, TraitRegistry, parse_model};

    use super::*;

    #[test]
    fn emits_all_five_files_for_a_minimal_service() {
        let src = r#"{
            "smithy": "2.0",
            "shapes": {
                "a#Svc": {
                    "type": "service",
                    "version": "2020-01-01",
                    "operations": [{ "target": "a#Ping" }],
                    "traits": {
                        "aws.protocols#restJson1": {},
                        "smithy.rules#endpointRuleSet": {
                            "version": "1.0",
                            "parameters": {},
                            "rules": [{ "type": "error", "conditions": [], "error": "no match" }]
                        }
                    }
                },
                "a#Ping": {
                    "type": "operation",
                    "traits": { "smithy.api#http": { "method": "GET", "uri": "/ping", "code": 200 } }
                }
            }
        }"#;
        let registry = TraitRegistry::with_builtins();
        let issues = IssuesBag::new();
        let model = parse_model(src, &registry, &issues, Policy::Abort).unwrap();
        let symbols = SymbolTable::new(&model);
        let files = generate_service(&symbols, ShapeId::of("a#Svc"), src).unwrap();
        assert_eq!(
            files.keys().collect::<Vec<_>>(),
            vec!["README.md", "client.zz", "endpoint.zz", "errors.zz", "shapes.zz"]
        );
    }
}
