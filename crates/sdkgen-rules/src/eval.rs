//! Interprets a [`RulesIr`] against a set of input parameters.
//!
//! This is the only evaluation path this crate ships: `sdkgen-emit` lowers
//! a rule set by embedding its source JSON and calling back into
//! [`crate::parse_rules_ir`]/[`resolve`] at generated-client runtime, so the
//! interpreter and "lowered" behavior are identical by construction rather
//! than by two implementations agreeing.

use std::collections::BTreeMap;

use crate::builtins;
use crate::error::{RulesError, RulesResult};
use crate::ir::{Condition, Expr, FunctionCall, Rule, RuleBody, RulesIr, Template, TemplatePart};
use crate::value::{Environment, Value};

pub use crate::ir::ResolvedEndpoint;

/// Resolve a rule set against a set of parameter values.
///
/// # Errors
/// [`RulesError::UnresolvedEndpoint`] if every rule's conditions fail,
/// [`RulesError::RuleError`] if a matched rule is an explicit `error` rule,
/// or any builtin-function error encountered along the way.
pub fn resolve(ir: &RulesIr, params: BTreeMap<String, Value>) -> RulesResult<ResolvedEndpoint> {
    let mut env = Environment::new(seed_defaults(ir, params));
    resolve_rules(&ir.rules, &mut env)?.ok_or(RulesError::UnresolvedEndpoint)
}

fn seed_defaults(ir: &RulesIr, mut params: BTreeMap<String, Value>) -> BTreeMap<String, Value> {
    for p in &ir.parameters {
        if !params.contains_key(&p.name) {
            if let Some(default) = &p.default {
                params.insert(p.name.clone(), default.clone());
            }
        }
    }
    params
}

fn resolve_rules(rules: &[Rule], env: &mut Environment) -> RulesResult<Option<ResolvedEndpoint>> {
    for rule in rules {
        env.push_scope();
        let matched = eval_conditions(&rule.conditions, env)?;
        let outcome = if matched {
            match &rule.body {
                RuleBody::Endpoint { url, properties, headers } => Some(Some(render_endpoint(url, properties, headers, env)?)),
                RuleBody::Error(template) => {
                    return Err(RulesError::RuleError(render_template(template, env)?));
                }
                RuleBody::Tree(children) => resolve_rules(children, env)?.map(Some),
            }
        } else {
            None
        };
        env.pop_scope();
        if let Some(result) = outcome {
            return Ok(result);
        }
    }
    Ok(None)
}

fn eval_conditions(conditions: &[Condition], env: &mut Environment) -> RulesResult<bool> {
    for condition in conditions {
        let value = eval_call(&condition.call, env)?;
        if !value.is_truthy() {
            return Ok(false);
        }
        if let Some(name) = &condition.assign {
            env.assign(name.clone(), value);
        }
    }
    Ok(true)
}

fn eval_expr(expr: &Expr, env: &Environment) -> RulesResult<Value> {
    match expr {
        Expr::Literal(v) => Ok(v.clone()),
        Expr::Ref(name) => Ok(env.get(name).cloned().unwrap_or(Value::None)),
        Expr::Call(call) => eval_call(call, env),
    }
}

fn eval_call(call: &FunctionCall, env: &Environment) -> RulesResult<Value> {
    let args = call.args.iter().map(|a| eval_expr(a, env)).collect::<RulesResult<Vec<_>>>()?;
    dispatch(&call.name, &args)
}

fn dispatch(name: &str, args: &[Value]) -> RulesResult<Value> {
    match name {
        "isSet" => Ok(Value::Bool(!matches!(args.first(), None | Some(Value::None)))),
        "not" => Ok(Value::Bool(!arg(args, 0)?.is_truthy())),
        "booleanEquals" => Ok(Value::Bool(arg(args, 0)?.as_bool() == arg(args, 1)?.as_bool())),
        "stringEquals" => Ok(Value::Bool(arg(args, 0)?.as_str() == arg(args, 1)?.as_str())),
        "getAttr" => {
            let path = arg(args, 1)?.as_str().ok_or_else(|| arity_error("getAttr"))?;
            builtins::get_attr(arg(args, 0)?, path)
        }
        "aws.parseArn" => {
            let input = arg(args, 0)?.as_str().ok_or_else(|| arity_error("aws.parseArn"))?;
            match builtins::parse_arn(input) {
                Ok(arn) => Ok(arn.into_value()),
                Err(RulesError::InvalidArn(_)) => Ok(Value::None),
                Err(other) => Err(other),
            }
        }
        "aws.partition" => {
            let region = arg(args, 0)?.as_str().ok_or_else(|| arity_error("aws.partition"))?;
            Ok(builtins::partition_for_region(region))
        }
        "aws.isVirtualHostableS3Bucket" => {
            let bucket = arg(args, 0)?.as_str().ok_or_else(|| arity_error("aws.isVirtualHostableS3Bucket"))?;
            let allow_subdomains = arg(args, 1).ok().and_then(Value::as_bool).unwrap_or(false);
            Ok(Value::Bool(builtins::is_virtual_hostable_s3_bucket(bucket, allow_subdomains)))
        }
        "isValidHostLabel" => {
            let value = arg(args, 0)?.as_str().ok_or_else(|| arity_error("isValidHostLabel"))?;
            let allow_subdomains = arg(args, 1).ok().and_then(Value::as_bool).unwrap_or(false);
            Ok(Value::Bool(builtins::is_valid_host_label(value, allow_subdomains)))
        }
        "uriEncode" => {
            let value = arg(args, 0)?.as_str().ok_or_else(|| arity_error("uriEncode"))?;
            Ok(Value::String(builtins::uri_encode(value)))
        }
        "substring" => {
            let input = arg(args, 0)?.as_str().ok_or_else(|| arity_error("substring"))?;
            let start = index_arg(args, 1)?;
            let stop = index_arg(args, 2)?;
            let reverse = arg(args, 3).ok().and_then(Value::as_bool).unwrap_or(false);
            Ok(builtins::substring(input, start, stop, reverse).map_or(Value::None, Value::String))
        }
        "parseURL" => {
            let value = arg(args, 0)?.as_str().ok_or_else(|| arity_error("parseURL"))?;
            Ok(builtins::parse_url(value).unwrap_or(Value::None))
        }
        other => Err(RulesError::UndefinedReference(other.to_owned())),
    }
}

fn arg<'a>(args: &'a [Value], index: usize) -> RulesResult<&'a Value> {
    args.get(index).ok_or_else(|| arity_error("<call>"))
}

fn index_arg(args: &[Value], index: usize) -> RulesResult<usize> {
    match arg(args, index)? {
        Value::String(s) => s.parse().map_err(|_| arity_error("<call>")),
        other => Err(RulesError::InvalidArguments {
            name: "<call>".to_owned(),
            reason: format!("expected an integer, got {other:?}"),
        }),
    }
}

fn arity_error(name: &str) -> RulesError {
    RulesError::InvalidArguments {
        name: name.to_owned(),
        reason: "missing or mistyped argument".to_owned(),
    }
}

fn render_template(template: &Template, env: &Environment) -> RulesResult<String> {
    let mut out = String::new();
    for part in &template.parts {
        match part {
            TemplatePart::Literal(s) => out.push_str(s),
            TemplatePart::Ref(name) => {
                let value = env.get(name).cloned().unwrap_or(Value::None);
                out.push_str(&render_value(&value));
            }
            TemplatePart::RefAttr(name, attr) => {
                let base = env.get(name).cloned().unwrap_or(Value::None);
                let value = builtins::get_attr(&base, attr)?;
                out.push_str(&render_value(&value));
            }
        }
    }
    Ok(out)
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::None => String::new(),
        other => format!("{other:?}"),
    }
}

fn render_endpoint(
    url: &Template,
    properties: &BTreeMap<String, Value>,
    headers: &BTreeMap<String, Vec<Template>>,
    env: &Environment,
) -> RulesResult<ResolvedEndpoint> {
    let url = render_template(url, env)?;
    let headers = headers
        .iter()
        .map(|(name, templates)| -> RulesResult<(String, Vec<String>)> {
            let rendered = templates.iter().map(|t| render_template(t, env)).collect::<RulesResult<Vec<_>>>()?;
            Ok((name.clone(), rendered))
        })
        .collect::<RulesResult<BTreeMap<_, _>>>()?;
    Ok(ResolvedEndpoint {
        url,
        properties: properties.clone(),
        headers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_rules_ir;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, Value> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), Value::String((*v).to_owned()))).collect()
    }

    #[test]
    fn resolves_the_first_matching_endpoint_rule() {
        let ir = parse_rules_ir(
            r#"{
                "parameters": {},
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
        let resolved = resolve(&ir, params(&[("Region", "us-west-2")])).unwrap();
        assert_eq!(resolved.url, "https://us-west-2.amazonaws.com");
    }

    #[test]
    fn falls_through_to_the_error_rule() {
        let ir = parse_rules_ir(
            r#"{
                "parameters": {},
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
        let err = resolve(&ir, BTreeMap::new()).unwrap_err();
        assert!(matches!(err, RulesError::RuleError(msg) if msg == "Region must be set"));
    }

    #[test]
    fn assign_bindings_are_scoped_to_their_rule() {
        let ir = parse_rules_ir(
            r#"{
                "parameters": {},
                "rules": [
                    {
                        "conditions": [
                            { "fn": "aws.parseArn", "argv": [{ "ref": "ResourceArn" }], "assign": "arn" },
                            { "fn": "isSet", "argv": [{ "ref": "arn" }] }
                        ],
                        "type": "endpoint",
                        "endpoint": { "url": "https://{arn#service}.{arn#region}.amazonaws.com" }
                    },
                    { "conditions": [], "type": "error", "error": "no match" }
                ]
            }"#,
        )
        .unwrap();
        let resolved = resolve(
            &ir,
            params(&[("ResourceArn", "arn:aws:ec2:us-east-1:012345678910:vpc/vpc-1")]),
        )
        .unwrap();
        assert_eq!(resolved.url, "https://ec2.us-east-1.amazonaws.com");
    }
}
