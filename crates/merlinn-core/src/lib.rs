//! Merlinn Core — record shapes of the Merlinn records store and the
//! schema registry that validates untyped records against them.
//!
//! This crate provides:
//! - Typed record models ([`models`]) with reference-or-embedded relations
//!   ([`Ref`])
//! - Field-level declarations for every entity ([`schema`])
//! - Validation reporting every offending field ([`SchemaRegistry`],
//!   [`ValidationError`])

pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod schema;

pub use config::{UnknownFields, ValidationConfig};
pub use error::{FieldIssue, IssueKind, MerlinnError, MerlinnResult, ValidationError};
pub use models::{Mapping, Model, ObjectId, RecordMeta, Ref, Stored};
pub use registry::{Record, SchemaRegistry};
pub use schema::{Entity, EntitySchema, FieldSpec, FieldType};
