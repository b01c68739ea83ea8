//! Endpoint rules IR, interpreter, and built-in functions for Smithy
//! `endpointRuleSet` documents.
//!
//! [`parse_rules_ir`] turns the trait's raw JSON payload into a
//! [`RulesIr`]; [`resolve`] evaluates that IR against a caller's
//! parameters to produce a [`ResolvedEndpoint`] or a rule-authored error
//! message. Both halves operate on the same [`ir`] types that `sdkgen-emit`
//! walks to lower a rule set into generated source, so interpretation and
//! lowering never drift apart.

pub mod builtins;
pub mod error;
pub mod ir;
pub mod value;

mod eval;
mod parse;

pub use error::{RulesError, RulesResult};
pub use eval::resolve;
pub use ir::{Condition, Expr, FunctionCall, Parameter, ResolvedEndpoint, Rule, RuleBody, RulesIr, Template, TemplatePart};
pub use parse::parse_rules_ir;
pub use value::{Environment, Value};
