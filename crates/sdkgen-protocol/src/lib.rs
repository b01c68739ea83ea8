//! Resolves an operation's wire protocol: HTTP method/URI/query/header/
//! payload binding and error matching.
//!
//! This crate sits between the symbols provider and the emitter: it
//! answers "what goes where on the wire" for one operation so the emitter
//! never has to inspect traits directly. `restJson1` and `awsJson1_*` are
//! bound end to end; `restXml`/`ec2Query`/`awsQuery` get the shared
//! URI/label/query/header machinery plus the [`body::BodyCodec`] seam.

pub mod binding;
pub mod body;
pub mod error;
pub mod protocol;
pub mod request;
pub mod response;
pub mod uri;

pub use binding::{HttpBinding, MemberBinding, classify_members};
pub use body::{BodyCodec, unsupported_body_issue};
pub use error::{ProtocolError, ProtocolResult};
pub use protocol::{Protocol, detect_protocol};
pub use request::{OperationBinding, bind_operation};
pub use response::{ErrorResponse, match_error};
pub use uri::{UriSegment, UriTemplate};
