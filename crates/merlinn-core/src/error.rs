//! Error types for the Merlinn records schema.

use std::fmt;

use thiserror::Error;

use crate::schema::Entity;

#[derive(Debug, Error)]
pub enum MerlinnError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Unknown entity: {name}")]
    UnknownEntity { name: String },

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(String),
}

pub type MerlinnResult<T> = Result<T, MerlinnError>;

/// A candidate record that does not conform to its entity's declaration.
///
/// `issues` lists every offending field, never just the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {entity} record: {}", join_issues(.issues))]
pub struct ValidationError {
    pub entity: Entity,
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Returns the issue reported for `path`, if any.
    pub fn issue(&self, path: &str) -> Option<&FieldIssue> {
        self.issues.iter().find(|issue| issue.path == path)
    }

    /// Dotted paths of every offending field, in declaration order.
    pub fn paths(&self) -> Vec<&str> {
        self.issues.iter().map(|issue| issue.path.as_str()).collect()
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single field that failed validation.
///
/// `path` is dotted for nested records (`vendor.name`) and indexed for
/// sequence elements (`fields[2]`). A non-object top-level value is
/// reported at `$`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub path: String,
    pub kind: IssueKind,
}

impl FieldIssue {
    pub fn new(path: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// Required field absent or `null`.
    Missing,
    /// Value of the wrong primitive type.
    WrongType { expected: String },
    /// Enumerated field holding a value outside its allowed set.
    NotInSet {
        found: String,
        allowed: &'static [&'static str],
    },
    /// Reference that is neither a valid identifier nor an embedded record.
    InvalidReference { reason: String },
    /// Undeclared field, only reported when unknown fields are rejected.
    UnknownField,
    /// The checked value could not be turned into the typed record.
    Malformed { message: String },
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("missing required field"),
            Self::WrongType { expected } => write!(f, "expected {expected}"),
            Self::NotInSet { found, allowed } => {
                write!(f, "{found} is not one of [{}]", allowed.join(", "))
            }
            Self::InvalidReference { reason } => write!(f, "invalid reference: {reason}"),
            Self::UnknownField => f.write_str("unknown field"),
            Self::Malformed { message } => write!(f, "malformed value: {message}"),
        }
    }
}

/// Failure to parse an object identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectIdError {
    #[error("expected 24 hexadecimal characters, found {0}")]
    Length(usize),

    #[error("non-hexadecimal character {0:?}")]
    NonHex(char),
}
