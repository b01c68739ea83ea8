//! Runtime values and the evaluation environment.

use std::collections::BTreeMap;

/// A dynamically-typed rules-language value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absence of a value; also doubles as "condition failed".
    None,
    /// A boolean.
    Bool(bool),
    /// A string.
    String(String),
    /// A record (used for `aws.parseArn`/`aws.partition` results and
    /// endpoint `properties`).
    Record(BTreeMap<String, Value>),
    /// A list (used for an ARN's `resourceId` segments).
    List(Vec<Value>),
}

impl Value {
    /// A condition is true if its result is a non-`None`, non-`false`
    /// value (spec §4.5: "true if its function returns a non-empty/
    /// non-false result").
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::None | Value::Bool(false))
    }

    /// Borrow as a string, if this value is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow as a bool, if this value is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow as a record, if this value is one.
    #[must_use]
    pub fn as_record(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }
}

/// The scoped mapping from parameter/binding name to value an evaluation
/// runs against. Bindings introduced by `assign` are pushed onto a new
/// scope so they go out of effect once their enclosing rule is done,
/// matching "bound into the environment for subsequent conditions and the
/// body" without leaking across sibling rules.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    scopes: Vec<BTreeMap<String, Value>>,
}

impl Environment {
    /// An environment seeded with one base scope of parameter values.
    #[must_use]
    pub fn new(parameters: BTreeMap<String, Value>) -> Self {
        Self { scopes: vec![parameters] }
    }

    /// Look up a name, searching inner scopes first.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Push a fresh, empty scope (entered when evaluating one rule's
    /// conditions).
    pub fn push_scope(&mut self) {
        self.scopes.push(BTreeMap::new());
    }

    /// Pop the innermost scope.
    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Bind a name in the innermost scope.
    pub fn assign(&mut self, name: impl Into<String>, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), value);
        }
    }
}
