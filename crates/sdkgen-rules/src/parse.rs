//! Parses an `endpointRuleSet` trait payload into [`crate::ir::RulesIr`].
//!
//! Drives the same hand-rolled [`sdkgen_model::json::JsonReader`] the model
//! parser uses, but builds a generic JSON tree first (`RawJson`) since,
//! unlike a Smithy shape document, a rule set's `argv` arrays mix literals,
//! `{"ref": ...}`, and nested `{"fn": ...}` calls with no fixed shape to
//! dispatch on ahead of time.

use std::collections::BTreeMap;

use sdkgen_model::json::{JsonReader, Token};

use crate::error::{RulesError, RulesResult};
use crate::ir::{Condition, FunctionCall, Parameter, Rule, RuleBody, RulesIr, Template};
use crate::value::Value;

#[derive(Debug, Clone)]
enum RawJson {
    Null,
    Bool(bool),
    String(String),
    Array(Vec<RawJson>),
    Object(Vec<(String, RawJson)>),
}

impl RawJson {
    fn as_str(&self) -> Option<&str> {
        match self {
            RawJson::String(s) => Some(s),
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            RawJson::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn as_array(&self) -> Option<&[RawJson]> {
        match self {
            RawJson::Array(items) => Some(items),
            _ => None,
        }
    }

    fn as_object(&self) -> Option<&[(String, RawJson)]> {
        match self {
            RawJson::Object(entries) => Some(entries),
            _ => None,
        }
    }

    fn field<'a>(&'a self, key: &str) -> Option<&'a RawJson> {
        self.as_object()?.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

fn read_raw(reader: &mut JsonReader<'_>) -> RulesResult<RawJson> {
    Ok(match reader.next()? {
        Token::Null => RawJson::Null,
        Token::Bool(b) => RawJson::Bool(b),
        Token::Number(n) => RawJson::String(n.to_string()),
        Token::String(s) => RawJson::String(s.to_owned()),
        Token::ArrayBegin => {
            let mut items = Vec::new();
            loop {
                if matches!(peek_skip_ws(reader)?, Token::ArrayEnd) {
                    reader.next()?;
                    break;
                }
                items.push(read_raw(reader)?);
                match reader.next()? {
                    Token::Comma => continue,
                    Token::ArrayEnd => break,
                    other => {
                        return Err(RulesError::Malformed(sdkgen_model::ModelError::UnexpectedToken {
                            expected: "',' or ']'".to_owned(),
                            got: format!("{other:?}"),
                        }));
                    }
                }
            }
            RawJson::Array(items)
        }
        Token::ObjectBegin => {
            let mut entries = Vec::new();
            loop {
                if matches!(peek_skip_ws(reader)?, Token::ObjectEnd) {
                    reader.next()?;
                    break;
                }
                let key = reader.read_string()?;
                match reader.next()? {
                    Token::Colon => {}
                    other => {
                        return Err(RulesError::Malformed(sdkgen_model::ModelError::UnexpectedToken {
                            expected: "':'".to_owned(),
                            got: format!("{other:?}"),
                        }));
                    }
                }
                entries.push((key, read_raw(reader)?));
                match reader.next()? {
                    Token::Comma => continue,
                    Token::ObjectEnd => break,
                    other => {
                        return Err(RulesError::Malformed(sdkgen_model::ModelError::UnexpectedToken {
                            expected: "',' or '}'".to_owned(),
                            got: format!("{other:?}"),
                        }));
                    }
                }
            }
            RawJson::Object(entries)
        }
        other => {
            return Err(RulesError::Malformed(sdkgen_model::ModelError::UnexpectedToken {
                expected: "a value".to_owned(),
                got: format!("{other:?}"),
            }));
        }
    })
}

fn peek_skip_ws<'a, 'b>(reader: &'b mut JsonReader<'a>) -> RulesResult<Token<'b>> {
    Ok(reader.peek()?)
}

fn to_value(raw: &RawJson) -> Value {
    match raw {
        RawJson::Null => Value::None,
        RawJson::Bool(b) => Value::Bool(*b),
        RawJson::String(s) => Value::String(s.clone()),
        RawJson::Array(items) => Value::List(items.iter().map(to_value).collect()),
        RawJson::Object(entries) => Value::Record(entries.iter().map(|(k, v)| (k.clone(), to_value(v))).collect()),
    }
}

fn to_expr(raw: &RawJson) -> RulesResult<crate::ir::Expr> {
    use crate::ir::Expr;
    if let Some(entries) = raw.as_object() {
        if let Some(name) = entries.iter().find(|(k, _)| k == "ref") {
            let name = name.1.as_str().ok_or_else(|| invalid("ref", "expected a string"))?;
            return Ok(Expr::Ref(name.to_owned()));
        }
        if let Some((_, name)) = entries.iter().find(|(k, _)| k == "fn") {
            let name = name.as_str().ok_or_else(|| invalid("fn", "expected a string"))?.to_owned();
            let args = raw
                .field("argv")
                .and_then(RawJson::as_array)
                .unwrap_or(&[])
                .iter()
                .map(to_expr)
                .collect::<RulesResult<Vec<_>>>()?;
            return Ok(Expr::Call(FunctionCall { name, args }));
        }
    }
    Ok(Expr::Literal(to_value(raw)))
}

fn invalid(name: &str, reason: &str) -> RulesError {
    RulesError::InvalidArguments {
        name: name.to_owned(),
        reason: reason.to_owned(),
    }
}

fn parse_condition(raw: &RawJson) -> RulesResult<Condition> {
    let name = raw
        .field("fn")
        .and_then(RawJson::as_str)
        .ok_or_else(|| invalid("condition", "missing \"fn\""))?
        .to_owned();
    let args = raw
        .field("argv")
        .and_then(RawJson::as_array)
        .unwrap_or(&[])
        .iter()
        .map(to_expr)
        .collect::<RulesResult<Vec<_>>>()?;
    let assign = raw.field("assign").and_then(RawJson::as_str).map(str::to_owned);
    Ok(Condition {
        call: FunctionCall { name, args },
        assign,
    })
}

fn parse_headers(raw: &RawJson) -> RulesResult<BTreeMap<String, Vec<Template>>> {
    let mut out = BTreeMap::new();
    for (name, values) in raw.as_object().unwrap_or(&[]) {
        let templates = values
            .as_array()
            .unwrap_or(&[])
            .iter()
            .map(|v| Template::parse(v.as_str().unwrap_or_default()))
            .collect();
        out.insert(name.clone(), templates);
    }
    Ok(out)
}

fn parse_rule(raw: &RawJson) -> RulesResult<Rule> {
    let conditions = raw
        .field("conditions")
        .and_then(RawJson::as_array)
        .unwrap_or(&[])
        .iter()
        .map(parse_condition)
        .collect::<RulesResult<Vec<_>>>()?;
    let type_tag = raw
        .field("type")
        .and_then(RawJson::as_str)
        .ok_or_else(|| invalid("rule", "missing \"type\""))?;
    let body = match type_tag {
        "endpoint" => {
            let ep = raw.field("endpoint").ok_or_else(|| invalid("endpoint", "missing \"endpoint\""))?;
            let url = Template::parse(ep.field("url").and_then(RawJson::as_str).unwrap_or_default());
            let properties = ep
                .field("properties")
                .and_then(RawJson::as_object)
                .unwrap_or(&[])
                .iter()
                .map(|(k, v)| (k.clone(), to_value(v)))
                .collect();
            let headers = ep.field("headers").map(parse_headers).transpose()?.unwrap_or_default();
            RuleBody::Endpoint { url, properties, headers }
        }
        "error" => {
            let msg = raw.field("error").and_then(RawJson::as_str).unwrap_or_default();
            RuleBody::Error(Template::parse(msg))
        }
        "tree" => {
            let rules = raw
                .field("rules")
                .and_then(RawJson::as_array)
                .unwrap_or(&[])
                .iter()
                .map(parse_rule)
                .collect::<RulesResult<Vec<_>>>()?;
            RuleBody::Tree(rules)
        }
        other => return Err(invalid("rule.type", &format!("unknown rule type {other:?}"))),
    };
    Ok(Rule { conditions, body })
}

fn parse_parameters(raw: &RawJson) -> Vec<Parameter> {
    raw.as_object()
        .unwrap_or(&[])
        .iter()
        .map(|(name, def)| Parameter {
            name: name.clone(),
            default: def.field("default").map(to_value),
            required: def.field("required").and_then(RawJson::as_bool).unwrap_or(false),
        })
        .collect()
}

/// Parse a complete `endpointRuleSet` JSON document.
///
/// # Errors
/// [`RulesError::Malformed`] on invalid JSON, or [`RulesError::InvalidArguments`]
/// if a rule or condition is missing a required field.
pub fn parse_rules_ir(src: &str) -> RulesResult<RulesIr> {
    let mut reader = JsonReader::new(src);
    let root = read_raw(&mut reader)?;
    let parameters = root.field("parameters").map(parse_parameters).unwrap_or_default();
    let rules = root
        .field("rules")
        .and_then(RawJson::as_array)
        .unwrap_or(&[])
        .iter()
        .map(parse_rule)
        .collect::<RulesResult<Vec<_>>>()?;
    Ok(RulesIr { parameters, rules })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_ruleset() {
        let ir = parse_rules_ir(
            r#"{
                "parameters": { "Region": { "required": true } },
                "rules": [
                    {
                        "conditions": [{ "fn": "isSet", "argv": [{ "ref": "Region" }] }],
                        "type": "endpoint",
                        "endpoint": { "url": "https://{Region}.amazonaws.com" }
                    },
                    { "conditions": [], "type": "error", "error": "Region must be set" }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(ir.parameters.len(), 1);
        assert_eq!(ir.rules.len(), 2);
    }
}
