//! The rules IR: the parsed shape of an `endpointRuleSet` trait payload.
//!
//! Kept as one small AST shared by both evaluation paths: [`crate::eval`]
//! walks it directly for fixture-driven self-tests, and `sdkgen-emit`
//! walks the same structure to lower it into generated source. Neither
//! path mutates the tree, so sharing it avoids the two ever drifting out
//! of lock-step.

use std::collections::BTreeMap;

use crate::value::Value;

/// A template string with `{param}` and `{param#attr}` interpolations,
/// e.g. `"https://{Region}.amazonaws.com"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// The parts to concatenate in order.
    pub parts: Vec<TemplatePart>,
}

/// One piece of a [`Template`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    /// Literal text copied as-is.
    Literal(String),
    /// `{name}` — substitute the named binding's string value.
    Ref(String),
    /// `{name#attr}` — substitute `getAttr(name, attr)`'s string value.
    RefAttr(String, String),
}

impl Template {
    /// Parse a template string, splitting on `{...}` interpolations.
    #[must_use]
    pub fn parse(src: &str) -> Self {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut chars = src.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '{' {
                let mut expr = String::new();
                for c2 in chars.by_ref() {
                    if c2 == '}' {
                        break;
                    }
                    expr.push(c2);
                }
                if !literal.is_empty() {
                    parts.push(TemplatePart::Literal(std::mem::take(&mut literal)));
                }
                match expr.split_once('#') {
                    Some((name, attr)) => parts.push(TemplatePart::RefAttr(name.to_owned(), attr.to_owned())),
                    None => parts.push(TemplatePart::Ref(expr)),
                }
            } else {
                literal.push(c);
            }
        }
        if !literal.is_empty() {
            parts.push(TemplatePart::Literal(literal));
        }
        Self { parts }
    }
}

/// An expression: a literal, a bound-name reference, or a function call.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal(Value),
    /// A reference to a parameter or `assign`-bound name.
    Ref(String),
    /// A built-in function call.
    Call(FunctionCall),
}

/// A built-in function invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// The function's name, e.g. `"aws.parseArn"`.
    pub name: String,
    /// Positional arguments.
    pub args: Vec<Expr>,
}

/// One condition in a rule's `conditions` list.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// The function call to evaluate.
    pub call: FunctionCall,
    /// If present, binds the call's result under this name for the rest
    /// of the rule's conditions and its body.
    pub assign: Option<String>,
}

/// What a rule does once its conditions all pass.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleBody {
    /// Emit an endpoint.
    Endpoint {
        /// URL template.
        url: Template,
        /// Endpoint properties (may include `authSchemes`).
        properties: BTreeMap<String, Value>,
        /// Extra headers, each value a list of templates.
        headers: BTreeMap<String, Vec<Template>>,
    },
    /// Fail resolution with a message.
    Error(Template),
    /// Recurse into child rules; first match wins.
    Tree(Vec<Rule>),
}

/// One node in the rule tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Conditions gating this rule, evaluated in order.
    pub conditions: Vec<Condition>,
    /// What happens if every condition passes.
    pub body: RuleBody,
}

/// A declared input parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// The parameter's name.
    pub name: String,
    /// The parameter's default value, if one is declared.
    pub default: Option<Value>,
    /// Whether the parameter must be supplied (absent a default).
    pub required: bool,
}

/// A fully parsed `endpointRuleSet` document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RulesIr {
    /// Declared input parameters.
    pub parameters: Vec<Parameter>,
    /// Top-level rules, tried in order.
    pub rules: Vec<Rule>,
}

/// A resolved endpoint: the result of a successful [`crate::resolve`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEndpoint {
    /// The endpoint URL.
    pub url: String,
    /// Endpoint properties, with templates already interpolated.
    pub properties: BTreeMap<String, Value>,
    /// Extra headers to send on every request to this endpoint.
    pub headers: BTreeMap<String, Vec<String>>,
}
