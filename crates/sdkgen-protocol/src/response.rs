//! Matches an error response back to a declared operation or service error.
//!
//! AWS's JSON protocols identify the thrown error by a `__type` body field
//! or an `X-Amzn-Errortype` header; `restXml`/query protocols identify it
//! by the `@httpError` code and the error shape's own name. This module
//! picks the matching error shape id; turning that id into a typed Rust
//! error value is the emitter's job.

use sdkgen_model::ShapeId;
use sdkgen_symbols::SymbolTable;

/// Everything this crate needs from an error HTTP response to match it.
#[derive(Debug, Clone, Default)]
pub struct ErrorResponse<'a> {
    /// The HTTP status code.
    pub status: u16,
    /// The `__type` JSON field or `X-Amzn-Errortype` header value, e.g.
    /// `"com.example#NoSuchBucket"` or `"NoSuchBucket"`.
    pub error_type: Option<&'a str>,
}

/// Match an error response to one of `candidates` (typically
/// [`sdkgen_symbols::SymbolTable::errors_of`] for the operation's service).
///
/// Matching prefers an exact `error_type` match (by absolute id or by its
/// shortname suffix, since AWS JSON services send the shortname-only form
/// under some protocol versions) and falls back to the unique candidate
/// whose `@httpError` code equals `response.status`, since `restXml`/query
/// services often send only a status code with no type discriminator.
#[must_use]
pub fn match_error(symbols: &SymbolTable<'_>, candidates: &[ShapeId], response: &ErrorResponse<'_>) -> Option<ShapeId> {
    if let Some(error_type) = response.error_type {
        let shortname = error_type.rsplit(['#', '.']).next().unwrap_or(error_type);
        for &candidate in candidates {
            let Some(name) = symbols.get_name(candidate) else { continue };
            if name == error_type || name == shortname {
                return Some(candidate);
            }
        }
    }

    let http_error_id = ShapeId::of("smithy.api#httpError");
    let mut by_status = candidates.iter().copied().filter(|&c| {
        symbols
            .get_trait(c, http_error_id)
            .and_then(sdkgen_model::TraitValue::downcast::<u64>)
            .is_some_and(|code| u16::try_from(*code).ok() == Some(response.status))
    });
    let first = by_status.next()?;
    if by_status.next().is_some() {
        return None;
    }
    Some(first)
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
    fn matches_by_error_type_shortname() {
        let model = build(
            r#"{
                "smithy": "2.0",
                "shapes": {
                    "a#NoSuchBucket": { "type": "structure", "traits": { "smithy.api#error": "client" } }
                }
            }"#,
        );
        let symbols = SymbolTable::new(&model);
        let candidates = [ShapeId::of("a#NoSuchBucket")];
        let response = ErrorResponse { status: 404, error_type: Some("com.example#NoSuchBucket") };
        assert_eq!(match_error(&symbols, &candidates, &response), Some(ShapeId::of("a#NoSuchBucket")));
    }

    #[test]
    fn matches_by_unique_http_error_code_when_untyped() {
        let model = build(
            r#"{
                "smithy": "2.0",
                "shapes": {
                    "a#NotFound": {
                        "type": "structure",
                        "traits": { "smithy.api#error": "client", "smithy.api#httpError": 404 }
                    }
                }
            }"#,
        );
        let symbols = SymbolTable::new(&model);
        let candidates = [ShapeId::of("a#NotFound")];
        let response = ErrorResponse { status: 404, error_type: None };
        assert_eq!(match_error(&symbols, &candidates, &response), Some(ShapeId::of("a#NotFound")));
    }

    #[test]
    fn no_match_when_nothing_fits() {
        let model = build(r#"{ "smithy": "2.0", "shapes": {} }"#);
        let symbols = SymbolTable::new(&model);
        let response = ErrorResponse { status: 500, error_type: None };
        assert_eq!(match_error(&symbols, &[], &response), None);
    }
}
