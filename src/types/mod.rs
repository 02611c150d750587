#![forbid(unsafe_code)]
#![allow(missing_docs)]

//! Error and result types shared by the query builder layers.

use std::fmt;

use thiserror::Error;

/// Errors recorded by the query builder.
///
/// The builder keeps the first error it encounters and reports it again from
/// every later assembly attempt, so the type is cheap to clone and compare.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Assembly was requested without any MATCH, CREATE, or MERGE clause.
    #[error("query must have at least one MATCH, CREATE, or MERGE clause")]
    Malformed,
    /// A caller-supplied parameter name is not a valid Cypher identifier.
    #[error("parameter name '{name}' must match [A-Za-z_][A-Za-z0-9_]*")]
    InvalidParameterName { name: String },
    /// A caller-supplied parameter name is already bound in this builder.
    #[error("parameter '${name}' is already bound")]
    DuplicateParameter { name: String },
    /// The configured parameter budget would be exceeded.
    #[error("query exceeds {max} parameters")]
    TooManyParameters { max: usize },
}

impl QueryError {
    /// Returns a machine-readable code for the error variant.
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::Malformed => "Malformed",
            QueryError::InvalidParameterName { .. } => "InvalidParameterName",
            QueryError::DuplicateParameter { .. } => "DuplicateParameter",
            QueryError::TooManyParameters { .. } => "TooManyParameters",
        }
    }
}

/// Convenience wrapper that formats query errors with their codes.
pub struct QueryErrorWithCode<'a>(pub &'a QueryError);

impl fmt::Display for QueryErrorWithCode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.0.code(), self.0)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QueryError>;
