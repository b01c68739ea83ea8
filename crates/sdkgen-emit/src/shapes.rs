//! Shape module emission: one declaration per non-prelude shape.
//!
//! Mirrors the teacher's `codegen/src/codegen.rs::write_enum`/
//! `write_struct` — `writeln!` into a growing `String`, no template
//! engine — generalized from a fixed `shared_structs`/`enums` map to
//! whatever shapes the symbols provider reports for a service.

use std::fmt::Write as _;

use sdkgen_model::{ShapeId, ShapeType};
use sdkgen_symbols::SymbolTable;

use crate::doc::write_doc_comment;
use crate::error::EmitResult;
use crate::ident::{member_name, type_name, variant_name};
use crate::types::rust_type;

const FILE_HEADER: &str = "// Code generated by sdkgen. DO NOT EDIT.";

/// Emit the shape module body for every shape reachable from `roots`.
///
/// # Errors
/// Propagates [`sdkgen_symbols::SymbolsError`] from member flattening.
pub fn generate_shapes(symbols: &SymbolTable<'_>, roots: &[ShapeId]) -> EmitResult<String> {
    let mut out = String::with_capacity(4 * 1024);
    writeln!(out, "{FILE_HEADER}")?;
    writeln!(out, "#![allow(non_camel_case_types)]")?;
    writeln!(out)?;

    let mut seen = std::collections::BTreeSet::new();
    let mut ordered = Vec::new();
    for root in roots {
        collect_topological(symbols, *root, &mut seen, &mut ordered)?;
    }

    for id in ordered {
        match symbols.get_shape(id) {
            Some(ShapeType::Structure(_)) => write_struct(&mut out, symbols, id)?,
            Some(ShapeType::Union(_)) => write_union(&mut out, symbols, id)?,
            Some(ShapeType::StrEnum(_)) => write_str_enum(&mut out, symbols, id)?,
            Some(ShapeType::IntEnum(_)) => write_int_enum(&mut out, symbols, id)?,
            _ => {}
        }
    }

    Ok(out)
}

/// Walk `id`'s member targets depth-first, pushing `id` to `order` only
/// after every target it reaches has already been pushed. This yields a
/// topological order — targets before referrers — with ties (shapes that
/// don't reference one another) broken by the order [`SymbolTable::members`]
/// declares them in, since that's the order this recursion visits them.
///
/// `seen` is marked before recursing into members so a reference cycle
/// breaks at whichever shape closes the loop rather than looping forever;
/// that shape still gets pushed once its non-cyclic members are ordered.
fn collect_topological(
    symbols: &SymbolTable<'_>,
    id: ShapeId,
    seen: &mut std::collections::BTreeSet<ShapeId>,
    order: &mut Vec<ShapeId>,
) -> EmitResult<()> {
    if !seen.insert(id) {
        return Ok(());
    }
    match symbols.get_shape(id) {
        Some(ShapeType::Structure(_) | ShapeType::Union(_)) => {
            for member in symbols.members(id)?.iter() {
                if let Some(target) = symbols.resolved_target(*member) {
                    collect_topological(symbols, target, seen, order)?;
                }
            }
        }
        Some(ShapeType::List(member) | ShapeType::Map(_, member)) => {
            if let Some(target) = symbols.resolved_target(*member) {
                collect_topological(symbols, target, seen, order)?;
            }
        }
        _ => {}
    }
    order.push(id);
    Ok(())
}

fn write_doc(out: &mut String, symbols: &SymbolTable<'_>, id: ShapeId) -> EmitResult<()> {
    let doc_id = ShapeId::of("smithy.api#documentation");
    if let Some(raw) = symbols.get_trait(id, doc_id).and_then(|t| t.downcast::<String>()) {
        write_doc_comment(out, "", raw)?;
    }
    Ok(())
}

fn write_struct(out: &mut String, symbols: &SymbolTable<'_>, id: ShapeId) -> EmitResult<()> {
    let name = type_name(symbols.get_name(id).unwrap_or_default());
    write_doc(out, symbols, id)?;
    writeln!(out, "#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]")?;
    writeln!(out, "pub struct {name} {{")?;
    let required_id = ShapeId::of("smithy.api#required");
    for member in symbols.members(id)?.iter() {
        let smithy_name = symbols.get_name(*member).unwrap_or_default();
        let field = member_name(smithy_name);
        let target = symbols.resolved_target(*member).unwrap_or(*member);
        let ty = rust_type(symbols, target);
        let required = symbols.has_trait(*member, required_id);
        let ty = if required { ty } else { format!("Option<{ty}>") };
        writeln!(out, "    #[serde(rename = \"{smithy_name}\")]")?;
        if !required {
            writeln!(out, "    #[serde(default, skip_serializing_if = \"Option::is_none\")]")?;
        }
        writeln!(out, "    pub {field}: {ty},")?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

fn write_union(out: &mut String, symbols: &SymbolTable<'_>, id: ShapeId) -> EmitResult<()> {
    let name = type_name(symbols.get_name(id).unwrap_or_default());
    write_doc(out, symbols, id)?;
    writeln!(out, "#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]")?;
    writeln!(out, "pub enum {name} {{")?;
    for member in symbols.members(id)?.iter() {
        let smithy_name = symbols.get_name(*member).unwrap_or_default();
        let variant = type_name(smithy_name);
        let target = symbols.resolved_target(*member).unwrap_or(*member);
        let ty = rust_type(symbols, target);
        writeln!(out, "    #[serde(rename = \"{smithy_name}\")]")?;
        writeln!(out, "    {variant}({ty}),")?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

fn write_str_enum(out: &mut String, symbols: &SymbolTable<'_>, id: ShapeId) -> EmitResult<()> {
    let name = type_name(symbols.get_name(id).unwrap_or_default());
    let enum_value_id = ShapeId::of("smithy.api#enumValue");
    write_doc(out, symbols, id)?;
    writeln!(out, "#[derive(Debug, Clone, PartialEq, Eq, Hash)]")?;
    writeln!(out, "pub enum {name} {{")?;
    let mut variants = Vec::new();
    for member in symbols.members(id)?.iter() {
        let smithy_name = symbols.get_name(*member).unwrap_or_default();
        let variant = variant_name(smithy_name);
        let wire_value = symbols
            .get_trait(*member, enum_value_id)
            .and_then(|t| t.downcast::<String>())
            .cloned()
            .unwrap_or_else(|| smithy_name.to_owned());
        writeln!(out, "    {variant},")?;
        variants.push((variant, wire_value));
    }
    writeln!(out, "    /// A value not known when this client was generated.")?;
    writeln!(out, "    Unknown(String),")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "impl {name} {{")?;
    writeln!(out, "    #[must_use]")?;
    writeln!(out, "    pub fn as_str(&self) -> &str {{")?;
    writeln!(out, "        match self {{")?;
    for (variant, wire_value) in &variants {
        writeln!(out, "            Self::{variant} => \"{wire_value}\",")?;
    }
    writeln!(out, "            Self::Unknown(s) => s,")?;
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    #[must_use]")?;
    writeln!(out, "    pub fn from_str_value(s: &str) -> Self {{")?;
    writeln!(out, "        match s {{")?;
    for (variant, wire_value) in &variants {
        writeln!(out, "            \"{wire_value}\" => Self::{variant},")?;
    }
    writeln!(out, "            other => Self::Unknown(other.to_owned()),")?;
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "impl serde::Serialize for {name} {{")?;
    writeln!(out, "    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {{")?;
    writeln!(out, "        serializer.serialize_str(self.as_str())")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "impl<'de> serde::Deserialize<'de> for {name} {{")?;
    writeln!(out, "    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {{")?;
    writeln!(out, "        let s = String::deserialize(deserializer)?;")?;
    writeln!(out, "        Ok(Self::from_str_value(&s))")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

fn write_int_enum(out: &mut String, symbols: &SymbolTable<'_>, id: ShapeId) -> EmitResult<()> {
    let name = type_name(symbols.get_name(id).unwrap_or_default());
    let enum_value_id = ShapeId::of("smithy.api#enumValue");
    write_doc(out, symbols, id)?;
    writeln!(out, "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]")?;
    writeln!(out, "pub enum {name} {{")?;
    let mut variants = Vec::new();
    for member in symbols.members(id)?.iter() {
        let smithy_name = symbols.get_name(*member).unwrap_or_default();
        let variant = variant_name(smithy_name);
        let wire_value = symbols
            .get_trait(*member, enum_value_id)
            .and_then(|t| t.downcast::<i64>())
            .copied()
            .unwrap_or_default();
        writeln!(out, "    {variant} = {wire_value},")?;
        variants.push((variant, wire_value));
    }
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "impl {name} {{")?;
    writeln!(out, "    #[must_use]")?;
    writeln!(out, "    pub fn from_i32(v: i32) -> Option<Self> {{")?;
    writeln!(out, "        match v {{")?;
    for (variant, wire_value) in &variants {
        writeln!(out, "            {wire_value} => Some(Self::{variant}),")?;
    }
    writeln!(out, "            _ => None,")?;
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "impl serde::Serialize for {name} {{")?;
    writeln!(out, "    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {{")?;
    writeln!(out, "        serializer.serialize_i32(*self as i32)")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "impl<'de> serde::Deserialize<'de> for {name} {{")?;
    writeln!(out, "    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {{")?;
    writeln!(out, "        let v = i32::deserialize(deserializer)?;")?;
    writeln!(
        out,
        "        Self::from_i32(v).ok_or_else(|| serde::de::Error::custom(format!(\"unknown {name} value {{v}}\")))"
    )?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
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
    fn emits_a_struct_with_optional_and_required_fields() {
        let model = build(
            r#"{
                "smithy": "2.0",
                "shapes": {
                    "a#Widget": {
                        "type": "structure",
                        "members": {
                            "id": { "target": "smithy.api#String", "traits": { "smithy.api#required": {} } },
                            "label": { "target": "smithy.api#String" }
                        }
                    }
                }
            }"#,
        );
        let symbols = SymbolTable::new(&model);
        let src = generate_shapes(&symbols, &[ShapeId::of("a#Widget")]).unwrap();
        assert!(src.contains("pub struct Widget {"));
        assert!(src.contains("pub id: String,"));
        assert!(src.contains("pub label: Option<String>,"));
    }

    #[test]
    fn emits_a_string_enum_with_unknown_fallthrough() {
        let model = build(
            r#"{
                "smithy": "2.0",
                "shapes": {
                    "a#Tier": {
                        "type": "enum",
                        "members": {
                            "STANDARD": { "target": "smithy.api#Unit", "traits": { "smithy.api#enumValue": "Standard" } }
                        }
                    }
                }
            }"#,
        );
        let symbols = SymbolTable::new(&model);
        let src = generate_shapes(&symbols, &[ShapeId::of("a#Tier")]).unwrap();
        assert!(src.contains("pub enum Tier {"));
        assert!(src.contains("Unknown(String),"));
        assert!(src.contains("\"Standard\" => Self::STANDARD,"));
    }

    #[test]
    fn orders_referenced_shapes_before_their_referrers() {
        let model = build(
            r#"{
                "smithy": "2.0",
                "shapes": {
                    "a#Order": {
                        "type": "structure",
                        "members": {
                            "item": { "target": "a#Item" }
                        }
                    },
                    "a#Item": {
                        "type": "structure",
                        "members": {
                            "sku": { "target": "smithy.api#String" }
                        }
                    }
                }
            }"#,
        );
        let symbols = SymbolTable::new(&model);
        let src = generate_shapes(&symbols, &[ShapeId::of("a#Order")]).unwrap();
        let item_pos = src.find("pub struct Item {").unwrap();
        let order_pos = src.find("pub struct Order {").unwrap();
        assert!(item_pos < order_pos, "referenced shape Item must be declared before its referrer Order");
    }
}
