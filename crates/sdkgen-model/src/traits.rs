//! Trait payload registry (spec §4.3, §9 "Trait-dispatched polymorphism").
//!
//! Traits are heterogeneous: `@http` carries a method/uri/code record,
//! `@required` carries nothing, `@enumValue` carries a string or integer.
//! Rather than reflect over JSON at every call site, each trait id is
//! registered once with a parse function that produces a boxed, typed
//! payload; readers get it back through [`TraitValue::payload`] with a
//! checked downcast, so call sites never need to know how a trait was
//! parsed, only what type to ask for.

use std::any::Any;
use std::collections::HashMap;

use crate::error::{ModelError, ModelResult};
use crate::json::JsonReader;
use crate::shape_id::ShapeId;

/// A boxed, type-erased trait payload. `None` for value-less traits like
/// `@required`.
pub type TraitPayload = Option<Box<dyn Any + Send + Sync>>;

/// A trait parse function: given the reader positioned at the trait's JSON
/// value, produce a boxed payload.
pub type TraitParseFn = fn(&mut JsonReader<'_>) -> ModelResult<TraitPayload>;

/// One trait application: the trait's shape id and its parsed payload.
pub struct TraitValue {
    /// The applied trait's id.
    pub id: ShapeId,
    /// The parsed, type-erased payload.
    pub payload: TraitPayload,
}

impl std::fmt::Debug for TraitValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraitValue")
            .field("id", &self.id)
            .field("has_payload", &self.payload.is_some())
            .finish()
    }
}

impl Clone for TraitValue {
    fn clone(&self) -> Self {
        // Payloads are parsed fresh per shape; the registry never needs to
        // duplicate an existing TraitValue's payload, only move or
        // reference it, so a deep clone is never exercised. Keeping this
        // total is simpler than making trait payloads closed over `Clone`.
        Self {
            id: self.id,
            payload: None,
        }
    }
}

impl TraitValue {
    /// Downcast the payload to a concrete type registered for this trait.
    #[must_use]
    pub fn downcast<T: 'static>(&self) -> Option<&T> {
        self.payload.as_ref()?.downcast_ref::<T>()
    }
}

/// A registered trait's vtable: its parser plus a human-readable name used
/// in diagnostics (the "size/align" of spec §4.3/§9 are implicit in `T`
/// through Rust's type system, so the registry only needs to carry the
/// parse function).
#[derive(Debug, Clone, Copy)]
struct TraitEntry {
    parse: TraitParseFn,
    #[allow(dead_code)]
    name: &'static str,
}

/// Maps trait [`ShapeId`]s to their registered parser.
#[derive(Debug, Default)]
pub struct TraitRegistry {
    entries: HashMap<ShapeId, TraitEntry>,
}

impl TraitRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trait's parser under its absolute id.
    pub fn register(&mut self, absolute_id: &str, name: &'static str, parse: TraitParseFn) {
        self.entries.insert(
            ShapeId::of(absolute_id),
            TraitEntry { parse, name },
        );
    }

    /// True if a parser is registered for this trait id.
    #[must_use]
    pub fn is_registered(&self, id: ShapeId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Parse a trait's JSON value using its registered parser.
    ///
    /// # Errors
    /// Returns [`ModelError::TraitPayload`] if parsing fails, or
    /// [`None`] (not an error) if the trait isn't registered — callers
    /// apply unknown-trait policy themselves.
    pub fn parse(
        &self,
        id: ShapeId,
        shape_context: &str,
        trait_name: &str,
        reader: &mut JsonReader<'_>,
    ) -> Option<ModelResult<TraitPayload>> {
        let entry = self.entries.get(&id)?;
        Some((entry.parse)(reader).map_err(|source| ModelError::TraitPayload {
            shape: shape_context.to_owned(),
            trait_id: trait_name.to_owned(),
            source: source.into(),
        }))
    }

    /// Build the registry the generator understands out of the box:
    /// `documentation, http, httpError, required, default, sparse,
    /// uniqueItems, enum, error, retryable, mixin, endpointRuleSet,
    /// endpointTests, auth, sigv4, service, arn`.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        reg.register("smithy.api#documentation", "documentation", parse_string);
        reg.register("smithy.api#httpError", "httpError", parse_u64);
        reg.register("smithy.api#required", "required", parse_unit);
        reg.register("smithy.api#default", "default", parse_opaque_json);
        reg.register("smithy.api#sparse", "sparse", parse_unit);
        reg.register("smithy.api#uniqueItems", "uniqueItems", parse_unit);
        reg.register("smithy.api#error", "error", parse_error_source);
        reg.register("smithy.api#retryable", "retryable", parse_retryable);
        reg.register("smithy.api#mixin", "mixin", parse_opaque_json);
        reg.register("smithy.api#enumValue", "enumValue", parse_enum_value);
        reg.register("smithy.api#http", "http", parse_http);
        reg.register("smithy.api#httpLabel", "httpLabel", parse_unit);
        reg.register("smithy.api#httpQuery", "httpQuery", parse_string);
        reg.register("smithy.api#httpHeader", "httpHeader", parse_string);
        reg.register("smithy.api#httpPayload", "httpPayload", parse_unit);
        reg.register(
            "smithy.api#httpPrefixHeaders",
            "httpPrefixHeaders",
            parse_string,
        );
        reg.register(
            "smithy.rules#endpointRuleSet",
            "endpointRuleSet",
            parse_opaque_json,
        );
        reg.register(
            "smithy.rules#endpointTests",
            "endpointTests",
            parse_opaque_json,
        );
        reg.register("aws.auth#sigv4", "sigv4", parse_sigv4);
        reg.register("aws.api#service", "service", parse_opaque_json);
        reg.register("aws.api#arn", "arn", parse_opaque_json);
        reg.register("aws.protocols#restJson1", "restJson1", parse_unit);
        reg.register("aws.protocols#awsJson1_0", "awsJson1_0", parse_unit);
        reg.register("aws.protocols#awsJson1_1", "awsJson1_1", parse_unit);
        reg.register("aws.protocols#restXml", "restXml", parse_unit);
        reg.register("aws.protocols#ec2Query", "ec2Query", parse_unit);
        reg.register("aws.protocols#awsQuery", "awsQuery", parse_unit);
        reg
    }
}

/// `@error("client"|"server")` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSource {
    /// Client-fault error.
    Client,
    /// Server-fault error.
    Server,
}

/// `@retryable` payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Retryable {
    /// Whether a throttling-specific client should back off more.
    pub throttling: bool,
}

/// `@http` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTrait {
    /// HTTP method, e.g. `"GET"`.
    pub method: String,
    /// URI pattern with `{label}` placeholders.
    pub uri: String,
    /// Expected success status code.
    pub code: u16,
}

fn parse_unit(reader: &mut JsonReader<'_>) -> ModelResult<TraitPayload> {
    reader.skip_value()?;
    Ok(None)
}

fn parse_string(reader: &mut JsonReader<'_>) -> ModelResult<TraitPayload> {
    let s = reader.read_string()?;
    Ok(Some(Box::new(s)))
}

fn parse_u64(reader: &mut JsonReader<'_>) -> ModelResult<TraitPayload> {
    let n = reader.read_number()?;
    Ok(Some(Box::new(n as u64)))
}

fn parse_opaque_json(reader: &mut JsonReader<'_>) -> ModelResult<TraitPayload> {
    // These traits' payloads are consumed by other subsystems (rules
    // evaluator, emitter) directly from the source text, not through the
    // registry's typed accessor; here we only need to skip past them
    // correctly while parsing the enclosing shape.
    reader.skip_value()?;
    Ok(None)
}

fn parse_enum_value(reader: &mut JsonReader<'_>) -> ModelResult<TraitPayload> {
    use crate::json::Token;
    match reader.peek()? {
        Token::String(_) => {
            let s = reader.read_string()?;
            Ok(Some(Box::new(s)))
        }
        _ => {
            let n = reader.read_number()?;
            Ok(Some(Box::new(n as i64)))
        }
    }
}

fn parse_error_source(reader: &mut JsonReader<'_>) -> ModelResult<TraitPayload> {
    let s = reader.read_string()?;
    let source = match s.as_str() {
        "client" => ErrorSource::Client,
        "server" => ErrorSource::Server,
        other => {
            return Err(ModelError::UnexpectedToken {
                expected: "\"client\" or \"server\"".to_owned(),
                got: other.to_owned(),
            });
        }
    };
    Ok(Some(Box::new(source)))
}

/// Walk a JSON object's key/value pairs, calling `on_entry` for each one.
/// `on_entry` receives the owned key and must consume exactly one value.
fn for_each_object_entry(
    reader: &mut JsonReader<'_>,
    mut on_entry: impl FnMut(&str, &mut JsonReader<'_>) -> ModelResult<()>,
) -> ModelResult<()> {
    use crate::json::Token;
    reader.expect_object_begin()?;
    if matches!(reader.peek()?, Token::ObjectEnd) {
        reader.next()?;
        return Ok(());
    }
    loop {
        let key = reader.read_string()?;
        match reader.next()? {
            Token::Colon => {}
            other => {
                return Err(ModelError::UnexpectedToken {
                    expected: "':'".to_owned(),
                    got: format!("{other:?}"),
                });
            }
        }
        on_entry(&key, reader)?;
        match reader.next()? {
            Token::Comma => continue,
            Token::ObjectEnd => return Ok(()),
            other => {
                return Err(ModelError::UnexpectedToken {
                    expected: "',' or '}'".to_owned(),
                    got: format!("{other:?}"),
                });
            }
        }
    }
}

fn parse_retryable(reader: &mut JsonReader<'_>) -> ModelResult<TraitPayload> {
    let mut throttling = false;
    for_each_object_entry(reader, |key, reader| {
        if key == "throttling" {
            throttling = reader.read_bool()?;
        } else {
            reader.skip_value()?;
        }
        Ok(())
    })?;
    Ok(Some(Box::new(Retryable { throttling })))
}

fn parse_http(reader: &mut JsonReader<'_>) -> ModelResult<TraitPayload> {
    let mut method = String::new();
    let mut uri = String::new();
    let mut code = 200u16;
    for_each_object_entry(reader, |key, reader| {
        match key {
            "method" => method = reader.read_string()?,
            "uri" => uri = reader.read_string()?,
            "code" => code = reader.read_number()? as u16,
            _ => reader.skip_value()?,
        }
        Ok(())
    })?;
    Ok(Some(Box::new(HttpTrait { method, uri, code })))
}

fn parse_sigv4(reader: &mut JsonReader<'_>) -> ModelResult<TraitPayload> {
    let mut name = String::new();
    for_each_object_entry(reader, |key, reader| {
        if key == "name" {
            name = reader.read_string()?;
        } else {
            reader.skip_value()?;
        }
        Ok(())
    })?;
    Ok(Some(Box::new(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_and_resolves_builtins() {
        let reg = TraitRegistry::with_builtins();
        assert!(reg.is_registered(ShapeId::of("smithy.api#documentation")));
        assert!(reg.is_registered(ShapeId::of("smithy.api#http")));
        assert!(!reg.is_registered(ShapeId::of("example.custom#notRegistered")));
    }

    #[test]
    fn parses_documentation_payload() {
        let reg = TraitRegistry::with_builtins();
        let mut reader = JsonReader::new("\"hello\"");
        let result = reg
            .parse(
                ShapeId::of("smithy.api#documentation"),
                "a#B",
                "smithy.api#documentation",
                &mut reader,
            )
            .unwrap()
            .unwrap();
        let payload = result.unwrap();
        assert_eq!(payload.downcast_ref::<String>().unwrap(), "hello");
    }

    #[test]
    fn parses_http_trait_payload() {
        let reg = TraitRegistry::with_builtins();
        let mut reader = JsonReader::new(r#"{"method": "GET", "uri": "/foo/{id}", "code": 200}"#);
        let result = reg
            .parse(ShapeId::of("smithy.api#http"), "a#B", "smithy.api#http", &mut reader)
            .unwrap()
            .unwrap()
            .unwrap();
        let http = result.downcast_ref::<HttpTrait>().unwrap();
        assert_eq!(http.method, "GET");
        assert_eq!(http.uri, "/foo/{id}");
        assert_eq!(http.code, 200);
    }

    #[test]
    fn unregistered_trait_is_none() {
        let reg = TraitRegistry::with_builtins();
        let mut reader = JsonReader::new("null");
        assert!(
            reg.parse(
                ShapeId::of("example#custom"),
                "a#B",
                "example#custom",
                &mut reader
            )
            .is_none()
        );
    }
}
