//! Errors module emission: one sum type per service, covering every error
//! shape reachable from it.

use std::fmt::Write as _;

use sdkgen_model::{ErrorSource, ShapeId};
use sdkgen_symbols::SymbolTable;

use crate::doc::write_doc_comment;
use crate::error::EmitResult;
use crate::ident::type_name;

const FILE_HEADER: &str = "// Code generated by sdkgen. DO NOT EDIT.";

/// Emit the errors module for `service`, one variant per declared error.
///
/// # Errors
/// Propagates buffer-write failures (effectively infallible for a
/// `String` target).
pub fn generate_errors(symbols: &SymbolTable<'_>, service: ShapeId) -> EmitResult<String> {
    let errors = symbols.errors_of(service);
    let mut out = String::with_capacity(2 * 1024);
    writeln!(out, "{FILE_HEADER}")?;
    writeln!(out)?;

    let name = format!("{}Error", type_name(symbols.get_name(service).unwrap_or("Service")));
    writeln!(out, "#[derive(Debug, Clone)]")?;
    writeln!(out, "pub enum {name} {{")?;
    for &error in &errors {
        let variant = type_name(symbols.get_name(error).unwrap_or_default());
        writeln!(out, "    {variant}(super::shapes::{variant}),")?;
    }
    writeln!(out, "    Unmodeled {{ code: String, message: String }},")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "impl {name} {{")?;
    write_doc(&mut out, symbols, service)?;
    writeln!(out, "    #[must_use]")?;
    writeln!(out, "    pub fn retryable(&self) -> bool {{")?;
    writeln!(out, "        match self {{")?;
    let retryable_id = ShapeId::of("smithy.api#retryable");
    for &error in &errors {
        let variant = type_name(symbols.get_name(error).unwrap_or_default());
        let retryable = symbols.has_trait(error, retryable_id);
        writeln!(out, "            Self::{variant}(_) => {retryable},")?;
    }
    writeln!(out, "            Self::Unmodeled {{ .. }} => false,")?;
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;

    writeln!(out, "    #[must_use]")?;
    writeln!(out, "    pub fn source(&self) -> &'static str {{")?;
    writeln!(out, "        match self {{")?;
    let error_id = ShapeId::of("smithy.api#error");
    for &error in &errors {
        let variant = type_name(symbols.get_name(error).unwrap_or_default());
        let source = match symbols.get_trait(error, error_id).and_then(|t| t.downcast::<ErrorSource>()) {
            Some(ErrorSource::Server) => "server",
            _ => "client",
        };
        writeln!(out, "            Self::{variant}(_) => \"{source}\",")?;
    }
    writeln!(out, "            Self::Unmodeled {{ .. }} => \"client\",")?;
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;

    writeln!(out, "    #[must_use]")?;
    writeln!(out, "    pub fn code(&self) -> Option<u16> {{")?;
    writeln!(out, "        match self {{")?;
    let http_error_id = ShapeId::of("smithy.api#httpError");
    for &error in &errors {
        let variant = type_name(symbols.get_name(error).unwrap_or_default());
        match symbols.get_trait(error, http_error_id).and_then(|t| t.downcast::<u64>()) {
            Some(code) => writeln!(out, "            Self::{variant}(_) => Some({code}),")?,
            None => writeln!(out, "            Self::{variant}(_) => None,")?,
        }
    }
    writeln!(out, "            Self::Unmodeled {{ .. }} => None,")?;
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    Ok(out)
}

fn write_doc(out: &mut String, symbols: &SymbolTable<'_>, id: ShapeId) -> EmitResult<()> {
    let doc_id = ShapeId::of("smithy.api#documentation");
    if let Some(raw) = symbols.get_trait(id, doc_id).and_then(|t| t.downcast::<String>()) {
        write_doc_comment(out, "    ", raw)?;
    }
    Ok(())
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
    fn emits_error_variants_with_retryable_and_code() {
        let model = build(
            r#"{
                "smithy": "2.0",
                "shapes": {
                    "a#Svc": {
                        "type": "service",
                        "version": "2020-01-01",
                        "errors": [{ "target": "a#NotFound" }]
                    },
                    "a#NotFound": {
                        "type": "structure",
                        "traits": {
                            "smithy.api#error": "client",
                            "smithy.api#httpError": 404,
                            "smithy.api#retryable": {}
                        }
                    }
                }
            }"#,
        );
        let symbols = SymbolTable::new(&model);
        let src = generate_errors(&symbols, ShapeId::of("a#Svc")).unwrap();
        assert!(src.contains("NotFound(super::shapes::NotFound),"));
        assert!(src.contains("Self::NotFound(_) => true,"));
        assert!(src.contains("Self::NotFound(_) => Some(404),"));
    }
}
