//! The runtime ABI generated clients are compiled against: configuration,
//! credentials, the HTTP transport seam, request signing, timestamps, and
//! the untyped document type — everything a generated `client.zz`/`shapes.zz`
//! pair calls into but doesn't itself define.
//!
//! Splitting this out (rather than inlining it into every generated crate,
//! as a quick one-off generator might) keeps generated code small and lets
//! every generated client share one tested implementation of the pieces
//! that have nothing to do with any particular service's shapes.

#![warn(missing_docs)]

pub mod config;
pub mod credentials;
pub mod document;
pub mod http;
pub mod result;
pub mod signer;
pub mod timestamp;

pub use config::Config;
pub use credentials::Credentials;
pub use document::Document;
pub use http::{ClientOperation, Endpoint, HttpClient, RawResponse, StubHttpClient};
pub use result::{Fault, OperationError, OperationResult, UnmodeledError};
pub use signer::Signer;
pub use timestamp::Timestamp;
