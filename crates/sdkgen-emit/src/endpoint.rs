//! Endpoint module emission.
//!
//! Per the design settled while building [`sdkgen_rules`]: rather than
//! compiling the rules tree down to bespoke generated Rust control flow
//! (which would require a second, hand-maintained lowering that has to
//! stay behaviorally identical to the interpreter), this emits the rule
//! set's raw JSON as a string constant and a thin `resolve` wrapper that
//! parses and interprets it once at call time through
//! [`sdkgen_rules::parse_rules_ir`]/[`sdkgen_rules::resolve`]. The
//! interpreter is the only evaluation path that exists, so generated
//! clients can never drift from it.

use std::fmt::Write as _;

use sdkgen_model::ShapeId;
use sdkgen_symbols::SymbolTable;

use crate::error::{EmitError, EmitResult};

const FILE_HEADER: &str = "// Code generated by sdkgen. DO NOT EDIT.";

/// The rule set substituted in when a service carries no `endpointRuleSet`
/// trait at all: honor an explicit `Config::endpoint_url` override, and
/// fail resolution otherwise rather than silently fabricating an endpoint.
const FALLBACK_RULE_SET_JSON: &str = r#"{
    "version": "1.0",
    "parameters": { "Endpoint": { "type": "String", "required": false } },
    "rules": [
        {
            "conditions": [{ "fn": "isSet", "argv": [{ "ref": "Endpoint" }] }],
            "type": "endpoint",
            "endpoint": { "url": "{Endpoint}" }
        },
        {
            "conditions": [],
            "type": "error",
            "error": "this service declares no endpoint rules; set Config::endpoint_url explicitly"
        }
    ]
}"#;

/// Emit the endpoint module for `service`.
///
/// `model_src` is the original model document text, needed to recover the
/// `endpointRuleSet` trait's raw JSON (the trait registry intentionally
/// discards that payload when parsing the model; see
/// [`sdkgen_model::extract_trait_json`]). Services with no such trait
/// (common for models that only exist to exercise non-endpoint-rules
/// behavior) get [`FALLBACK_RULE_SET_JSON`] instead of a hard failure.
///
/// # Errors
/// [`EmitError::UnknownShapeReference`] if `service` isn't in the model at
/// all, or an [`EmitError::Other`] if a declared `endpointRuleSet`
/// trait's JSON can't be located in `model_src`.
pub fn generate_endpoint(symbols: &SymbolTable<'_>, service: ShapeId, model_src: &str) -> EmitResult<String> {
    let service_absolute = symbols
        .model()
        .absolute_of(service)
        .ok_or(EmitError::UnknownShapeReference(service))?;

    let rule_set_json = sdkgen_model::extract_trait_json(model_src, service_absolute, "smithy.rules#endpointRuleSet")
        .map_err(anyhow::Error::from)?
        .unwrap_or(FALLBACK_RULE_SET_JSON);

    let mut out = String::with_capacity(2 * 1024);
    writeln!(out, "{FILE_HEADER}")?;
    writeln!(out)?;
    writeln!(out, "/// Parameters this service's endpoint rules read from client configuration.")?;
    writeln!(out, "#[derive(Debug, Clone, Default)]")?;
    writeln!(out, "pub struct EndpointParams {{")?;
    writeln!(out, "    pub region: Option<String>,")?;
    writeln!(out, "    pub use_dual_stack: Option<bool>,")?;
    writeln!(out, "    pub use_fips: Option<bool>,")?;
    writeln!(out, "    pub endpoint: Option<String>,")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "impl EndpointParams {{")?;
    writeln!(out, "    #[must_use]")?;
    writeln!(out, "    pub fn from_config(config: &sdkgen_runtime::Config) -> Self {{")?;
    writeln!(out, "        Self {{")?;
    writeln!(out, "            region: config.region.clone(),")?;
    writeln!(out, "            use_dual_stack: config.use_dual_stack,")?;
    writeln!(out, "            use_fips: config.use_fips,")?;
    writeln!(out, "            endpoint: config.endpoint_url.clone(),")?;
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "const RULE_SET_JSON: &str = r#####\"{rule_set_json}\"#####;")?;
    writeln!(out)?;

    writeln!(out, "/// Resolve this service's endpoint for one request.")?;
    writeln!(out, "///")?;
    writeln!(out, "/// # Errors")?;
    writeln!(out, "/// Propagates [`sdkgen_rules::RulesError`] if the embedded rule set fails to")?;
    writeln!(out, "/// parse or no rule matches the given parameters.")?;
    writeln!(out, "pub fn resolve(params: &EndpointParams) -> sdkgen_rules::RulesResult<sdkgen_rules::ResolvedEndpoint> {{")?;
    writeln!(out, "    let ir = sdkgen_rules::parse_rules_ir(RULE_SET_JSON)?;")?;
    writeln!(out, "    let mut values = std::collections::BTreeMap::new();")?;
    writeln!(out, "    if let Some(region) = &params.region {{")?;
    writeln!(out, "        values.insert(\"Region\".to_owned(), sdkgen_rules::Value::String(region.clone()));")?;
    writeln!(out, "    }}")?;
    writeln!(out, "    if let Some(dual_stack) = params.use_dual_stack {{")?;
    writeln!(out, "        values.insert(\"UseDualStack\".to_owned(), sdkgen_rules::Value::Bool(dual_stack));")?;
    writeln!(out, "    }}")?;
    writeln!(out, "    if let Some(fips) = params.use_fips {{")?;
    writeln!(out, "        values.insert(\"UseFIPS\".to_owned(), sdkgen_rules::Value::Bool(fips));")?;
    writeln!(out, "    }}")?;
    writeln!(out, "    if let Some(endpoint) = &params.endpoint {{")?;
    writeln!(out, "        values.insert(\"Endpoint\".to_owned(), sdkgen_rules::Value::String(endpoint.clone()));")?;
    writeln!(out, "    }}")?;
    writeln!(out, "    sdkgen_rules::resolve(&ir, values)")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    Ok(out)
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
    fn embeds_the_rule_set_json_as_a_raw_string() {
        let src = r#"{
            "smithy": "2.0",
            "shapes": {
                "a#Svc": {
                    "type": "service",
                    "version": "2020-01-01",
                    "traits": {
                        "smithy.rules#endpointRuleSet": {
                            "version": "1.0",
                            "parameters": {},
                            "rules": [
                                { "type": "error", "conditions": [], "error": "no match" }
                            ]
                        }
                    }
                }
            }
        }"#;
        let model = build(src);
        let symbols = SymbolTable::new(&model);
        let out = generate_endpoint(&symbols, ShapeId::of("a#Svc"), src).unwrap();
        assert!(out.contains("const RULE_SET_JSON"));
        assert!(out.contains("\"version\""));
        assert!(out.contains("pub fn resolve(params: &EndpointParams)"));
    }

    #[test]
    fn falls_back_to_a_default_rule_set_when_absent() {
        let src = r#"{
            "smithy": "2.0",
            "shapes": {
                "a#Svc": { "type": "service", "version": "2020-01-01" }
            }
        }"#;
        let model = build(src);
        let symbols = SymbolTable::new(&model);
        let out = generate_endpoint(&symbols, ShapeId::of("a#Svc"), src).unwrap();
        assert!(out.contains("declares no endpoint rules"));
    }
}
