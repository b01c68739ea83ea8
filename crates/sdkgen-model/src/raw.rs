//! Extracts a single trait's raw JSON text from a model document.
//!
//! A handful of traits (`endpointRuleSet`, `endpointTests`) are registered
//! with [`crate::traits::TraitRegistry`] using the opaque-skip parser:
//! their payload is a full sub-tree another crate (`sdkgen-rules`) parses
//! on its own terms, not a fixed Rust type the registry can hand back.
//! Rather than force that crate to re-walk the whole model, this module
//! does one targeted scan for the named shape's named trait and hands
//! back the exact source slice, which the caller re-feeds to its own
//! reader.

use crate::error::ModelResult;
use crate::json::{JsonReader, Token};

fn skip_to_object_key(reader: &mut JsonReader<'_>, key: &str) -> ModelResult<bool> {
    reader.expect_object_begin()?;
    loop {
        if matches!(reader.peek()?, Token::ObjectEnd) {
            reader.next()?;
            return Ok(false);
        }
        let found = reader.read_string()? == key;
        match reader.next()? {
            Token::Colon => {}
            _ => return Ok(false),
        }
        if found {
            return Ok(true);
        }
        reader.skip_value()?;
        match reader.next()? {
            Token::Comma => continue,
            Token::ObjectEnd => return Ok(false),
            _ => return Ok(false),
        }
    }
}

/// Find `shapes[shape_absolute].traits[trait_absolute]` and return its raw
/// JSON source text, unparsed.
///
/// # Errors
/// Propagates any error the underlying reader hits while scanning.
pub fn extract_trait_json<'src>(src: &'src str, shape_absolute: &str, trait_absolute: &str) -> ModelResult<Option<&'src str>> {
    let mut reader = JsonReader::new(src);
    if !skip_to_object_key(&mut reader, "shapes")? {
        return Ok(None);
    }
    if !skip_to_object_key(&mut reader, shape_absolute)? {
        return Ok(None);
    }
    // Walk this shape's own object looking for "traits".
    reader.expect_object_begin()?;
    loop {
        if matches!(reader.peek()?, Token::ObjectEnd) {
            reader.next()?;
            return Ok(None);
        }
        let key = reader.read_string()?;
        reader.next()?; // colon
        if key == "traits" {
            if !skip_to_object_key(&mut reader, trait_absolute)? {
                return Ok(None);
            }
            let start = reader.offset();
            reader.skip_value()?;
            let end = reader.offset();
            return Ok(Some(src[start..end].trim()));
        }
        reader.skip_value()?;
        match reader.next()? {
            Token::Comma => continue,
            Token::ObjectEnd => return Ok(None),
            _ => return Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_a_named_traits_raw_json() {
        let src = r#"{
            "smithy": "2.0",
            "shapes": {
                "a#Svc": {
                    "type": "service",
                    "traits": {
                        "smithy.rules#endpointRuleSet": { "parameters": {}, "rules": [] },
                        "smithy.api#documentation": "hello"
                    }
                }
            }
        }"#;
        let raw = extract_trait_json(src, "a#Svc", "smithy.rules#endpointRuleSet").unwrap().unwrap();
        assert_eq!(raw, r#"{ "parameters": {}, "rules": [] }"#);
    }

    #[test]
    fn returns_none_for_a_missing_shape() {
        let src = r#"{"shapes": {"a#Svc": {"type": "service", "traits": {}}}}"#;
        assert!(extract_trait_json(src, "a#Other", "x").unwrap().is_none());
    }
}
