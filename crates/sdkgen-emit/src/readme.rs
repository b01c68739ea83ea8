//! README emission: a short per-service usage summary.

use std::fmt::Write as _;

use sdkgen_model::ShapeId;
use sdkgen_symbols::SymbolTable;

use crate::doc::html_to_markdown;
use crate::error::EmitResult;
use crate::ident::{member_name, type_name};


/// Emit `README.md` for `service`.
///
/// # Errors
/// Propagates buffer-write failures (effectively infallible for a
/// `String` target).
pub fn generate_readme(symbols: &SymbolTable<'_>, service: ShapeId) -> EmitResult<String> {
    let name = type_name(symbols.get_name(service).unwrap_or("Service"));
    let mut out = String::with_capacity(1024);
    writeln!(out, "# {name}")?;
    writeln!(out)?;

    let doc_id = ShapeId::of("smithy.api#documentation");
    if let Some(raw) = symbols.get_trait(service, doc_id).and_then(|t| t.downcast::<String>()) {
        writeln!(out, "{}", html_to_markdown(raw))?;
        writeln!(out)?;
    }

    writeln!(out, "## Operations")?;
    writeln!(out)?;
    for operation in symbols.operations_of(service) {
        let op_name = member_name(symbols.get_name(operation).unwrap_or_default());
        writeln!(out, "- `{op_name}`")?;
    }
    writeln!(out)?;

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
    fn lists_every_operation() {
        let model = build(
            r#"{
                "smithy": "2.0",
                "shapes": {
                    "a#Svc": {
                        "type": "service",
                        "version": "2020-01-01",
                        "operations": [{ "target": "a#GetWidget" }]
                    },
                    "a#GetWidget": { "type": "operation" }
                }
            }"#,
        );
        let symbols = SymbolTable::new(&model);
        let readme = generate_readme(&symbols, ShapeId::of("a#Svc")).unwrap();
        assert!(readme.contains("# Svc"));
        assert!(readme.contains("- `get_widget`"));
    }
}
