//! Identifier case rewriting and reserved-word escaping.
//!
//! Generalizes the teacher's `codegen/src/shapes.rs::to_snake_case`/
//! `to_pascal_case` (a two-keyword `match` hardcoded for S3's member
//! names) into a full Rust reserved-word table, plus the
//! `SCREAMING_CASE` variant rule this generator's shapes additionally
//! need.

use heck::{ToPascalCase, ToShoutySnakeCase, ToSnakeCase};

/// Rust 2024 keywords and reserved words that can't be used as a bare
/// identifier.
const RESERVED: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Reserved words `r#` can't rescue: `self`/`Self`/`super`/`crate` stay
/// keywords even as raw identifiers (<https://doc.rust-lang.org/reference/identifiers.html>).
/// These fall back to a trailing underscore instead.
const NOT_RAW_ESCAPABLE: &[&str] = &["self", "Self", "super", "crate"];

fn escape_reserved(ident: String) -> String {
    if NOT_RAW_ESCAPABLE.contains(&ident.as_str()) {
        format!("{ident}_")
    } else if RESERVED.contains(&ident.as_str()) {
        format!("r#{ident}")
    } else {
        ident
    }
}

/// A structure/union/enum type name, e.g. `"NoSuchBucket"`.
#[must_use]
pub fn type_name(smithy_name: &str) -> String {
    smithy_name.to_pascal_case()
}

/// A member or local variable name, e.g. `"bucket_name"`.
#[must_use]
pub fn member_name(smithy_name: &str) -> String {
    escape_reserved(smithy_name.to_snake_case())
}

/// An enum variant name, e.g. `"STANDARD_IA"`.
#[must_use]
pub fn variant_name(smithy_name: &str) -> String {
    escape_reserved(smithy_name.to_shouty_snake_case())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_reserved_member_names() {
        assert_eq!(member_name("Type"), "r#type");
        assert_eq!(member_name("BucketName"), "bucket_name");
    }

    #[test]
    fn converts_type_and_variant_case() {
        assert_eq!(type_name("noSuchBucket"), "NoSuchBucket");
        assert_eq!(variant_name("StandardIa"), "STANDARD_IA");
    }

    #[test]
    fn falls_back_to_a_trailing_underscore_for_words_r_hash_cannot_escape() {
        assert_eq!(member_name("self"), "self_");
        assert_eq!(member_name("crate"), "crate_");
        assert_eq!(member_name("super"), "super_");
        assert_eq!(member_name("Self"), "self_");
    }
}
