//! Streaming JSON reader and Smithy 2.0 model parser.
//!
//! This crate turns a Smithy JSON AST document into [`model::ModelTables`]:
//! every shape's type and own members, every shape's directly-applied
//! traits, and the `mixins` edges between shapes. It does not resolve
//! mixins, compute names, or answer "what traits does this shape have
//! counting mixins" — that's the `sdkgen-symbols` crate, built on top.

pub mod error;
pub mod issues;
pub mod json;
pub mod model;
pub mod parser;
pub mod raw;
pub mod shape_id;
pub mod shape_type;
pub mod traits;

pub use error::{ModelError, ModelResult};
pub use issues::{Issue, IssuesBag, Policy};
pub use model::{ModelTables, ShapeEntry};
pub use parser::parse_model;
pub use raw::extract_trait_json;
pub use shape_id::ShapeId;
pub use shape_type::{OperationMeta, ResourceMeta, ServiceMeta, ShapeType, SimpleType};
pub use traits::{ErrorSource, HttpTrait, Retryable, TraitRegistry, TraitValue};
