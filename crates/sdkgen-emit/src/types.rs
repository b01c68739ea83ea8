//! Smithy shape to Rust type resolution.
//!
//! Generalizes the teacher's `codegen/src/shapes.rs::resolve_rust_type`/
//! `resolve_builtin_type` (a `match` over a fixed S3 shape set) into a
//! walk driven by [`sdkgen_symbols::SymbolTable`], so it works over any
//! model's shape graph instead of one hardcoded target list.

use sdkgen_model::{ShapeId, ShapeType, SimpleType};
use sdkgen_symbols::SymbolTable;

use crate::ident::type_name;

/// Resolve `target` to the Rust type that represents it in generated
/// code. Prelude simple types map to Rust primitives; aggregates and
/// named shapes resolve to their emitted type name.
#[must_use]
pub fn rust_type(symbols: &SymbolTable<'_>, target: ShapeId) -> String {
    if let Some(builtin) = builtin_type(target) {
        return builtin.to_owned();
    }

    match symbols.get_shape(target) {
        Some(ShapeType::Simple(simple)) => simple_type(*simple),
        Some(ShapeType::List(member)) => {
            let member_target = symbols.resolved_target(*member).unwrap_or(*member);
            format!("Vec<{}>", rust_type(symbols, member_target))
        }
        Some(ShapeType::Map(key, value)) => {
            let key_target = symbols.resolved_target(*key).unwrap_or(*key);
            let value_target = symbols.resolved_target(*value).unwrap_or(*value);
            format!("std::collections::HashMap<{}, {}>", rust_type(symbols, key_target), rust_type(symbols, value_target))
        }
        Some(ShapeType::Structure(_) | ShapeType::Union(_) | ShapeType::StrEnum(_) | ShapeType::IntEnum(_)) => {
            symbols.get_name(target).map(type_name).unwrap_or_else(|| "String".to_owned())
        }
        Some(ShapeType::Target(inner)) => rust_type(symbols, *inner),
        _ => "String".to_owned(),
    }
}

fn builtin_type(id: ShapeId) -> Option<&'static str> {
    Some(match id {
        ShapeId::STRING => "String",
        ShapeId::BOOLEAN => "bool",
        ShapeId::BYTE => "i8",
        ShapeId::SHORT => "i16",
        ShapeId::INTEGER => "i32",
        ShapeId::LONG => "i64",
        ShapeId::FLOAT => "f32",
        ShapeId::DOUBLE => "f64",
        ShapeId::BIG_INTEGER => "String",
        ShapeId::BIG_DECIMAL => "String",
        ShapeId::BLOB => "bytes::Bytes",
        ShapeId::TIMESTAMP => "chrono::DateTime<chrono::Utc>",
        ShapeId::DOCUMENT => "serde_json::Value",
        ShapeId::UNIT => "()",
        _ => return None,
    })
}

fn simple_type(simple: SimpleType) -> String {
    match simple {
        SimpleType::String => "String",
        SimpleType::Boolean => "bool",
        SimpleType::Byte => "i8",
        SimpleType::Short => "i16",
        SimpleType::Integer => "i32",
        SimpleType::Long => "i64",
        SimpleType::Float => "f32",
        SimpleType::Double => "f64",
        SimpleType::BigInteger | SimpleType::BigDecimal => "String",
        SimpleType::Blob => "bytes::Bytes",
        SimpleType::Timestamp => "chrono::DateTime<chrono::Utc>",
        SimpleType::Document => "serde_json::Value",
        SimpleType::Unit => "()",
    }
    .to_owned()
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
    fn resolves_prelude_and_list_types() {
        let model = build(
            r#"{
                "smithy": "2.0",
                "shapes": {
                    "a#Names": { "type": "list", "member": { "target": "smithy.api#String" } }
                }
            }"#,
        );
        let symbols = SymbolTable::new(&model);
        assert_eq!(rust_type(&symbols, ShapeId::STRING), "String");
        assert_eq!(rust_type(&symbols, ShapeId::of("a#Names")), "Vec<String>");
    }

    #[test]
    fn resolves_a_structure_to_its_type_name() {
        let model = build(
            r#"{
                "smithy": "2.0",
                "shapes": { "a#Widget": { "type": "structure" } }
            }"#,
        );
        let symbols = SymbolTable::new(&model);
        assert_eq!(rust_type(&symbols, ShapeId::of("a#Widget")), "Widget");
    }
}
