//! The generated-operation result shape: `Result<Ok, Err>` where `Err`
//! exposes `{ kind, message, http_status(), source(), retryable() }`.
//!
//! A generated errors module (see `sdkgen-emit::errors`) already emits a
//! per-service sum type with `retryable()`/`source()`/`code()` methods
//! matching this shape by construction; [`OperationError`] is the trait
//! that sum type implements, so client code can handle any service's
//! error uniformly (retry policy, logging) without matching on its
//! concrete variants.

/// Client- or server-fault classification for an operation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The caller's request was invalid.
    Client,
    /// The service failed to fulfill an otherwise-valid request.
    Server,
}

/// The common surface every generated service error type exposes.
pub trait OperationError: std::error::Error {
    /// A short, stable error identifier (the Smithy shape's name).
    fn kind(&self) -> &str;
    /// The HTTP status code the error was reported under, if known.
    fn http_status(&self) -> Option<u16>;
    /// Whether the error originated from the caller or the service.
    fn source(&self) -> Fault;
    /// Whether retrying the same request might succeed.
    fn retryable(&self) -> bool;
}

/// An error with no generated shape behind it: a transport failure, an
/// unparseable response, or a wire error code the model didn't declare.
#[derive(Debug, Clone)]
pub struct UnmodeledError {
    /// The error code as reported on the wire, if any.
    pub kind: String,
    /// A human-readable message.
    pub message: String,
    /// The HTTP status code, if the failure happened after a response
    /// was received.
    pub http_status: Option<u16>,
}

impl std::fmt::Display for UnmodeledError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for UnmodeledError {}

impl OperationError for UnmodeledError {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    fn source(&self) -> Fault {
        Fault::Client
    }

    fn retryable(&self) -> bool {
        false
    }
}

/// An operation's return type: the typed output, or an error meeting the
/// [`OperationError`] contract.
pub type OperationResult<T, E> = Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmodeled_error_reports_client_fault_and_is_not_retryable() {
        let err = UnmodeledError { kind: "Unknown".to_owned(), message: "boom".to_owned(), http_status: Some(500) };
        assert_eq!(err.source(), Fault::Client);
        assert!(!err.retryable());
        assert_eq!(err.http_status(), Some(500));
    }
}
