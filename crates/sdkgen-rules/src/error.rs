//! Errors raised while parsing or evaluating an endpoint rule set.

/// Errors raised by [`crate::parse_rules_ir`] or [`crate::resolve`].
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// The `endpointRuleSet` JSON document was malformed.
    #[error("malformed rule set: {0}")]
    Malformed(#[from] sdkgen_model::ModelError),

    /// A rule referenced a parameter or binding never defined.
    #[error("reference to undefined parameter or binding {0:?}")]
    UndefinedReference(String),

    /// A built-in function was called with the wrong number or type of
    /// arguments.
    #[error("function {name:?} called with invalid arguments: {reason}")]
    InvalidArguments {
        /// The function's name.
        name: String,
        /// What was wrong.
        reason: String,
    },

    /// No rule in the rule set matched; the endpoint is unresolved.
    #[error("no endpoint rule matched the given parameters")]
    UnresolvedEndpoint,

    /// An `error` rule matched.
    #[error("{0}")]
    RuleError(String),

    /// `"arn:..."` failed to parse as a valid ARN.
    #[error("invalid ARN: {0:?}")]
    InvalidArn(String),
}

/// Result alias for this crate.
pub type RulesResult<T> = Result<T, RulesError>;
