//! The `Document` "any" value type used for untyped/open content.

/// An untyped value, for members the protocol binder treats as opaque
/// (spec's `Document` — unknown shapes, `document` shapes, and catch-all
/// union members). Generated code never introspects a `Document` beyond
/// round-tripping it.
pub type Document = serde_json::Value;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trips_arbitrary_json() {
        let doc: Document = json!({ "a": 1, "b": [true, null] });
        assert_eq!(doc["a"], 1);
    }
}
