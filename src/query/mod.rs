#![forbid(unsafe_code)]

//! Parameterized Cypher query construction.
//!
//! Patterns are assembled from node and relationship elements, clauses are
//! accumulated on a [`QueryBuilder`], and every literal ends up in a
//! [`Parameters`] table instead of the query text.

/// Fluent query builder and assembled query types.
pub mod builder;

/// Declarative query documents replayed onto a builder.
pub mod document;

/// Builder tuning knobs.
pub mod options;

/// Parameter table and name minting.
pub mod params;

/// Node and relationship pattern elements.
///
/// Each element renders itself to text and binds its literal properties.
pub mod pattern;

/// Literal values.
pub mod value;

pub use builder::{BuiltQuery, CypherQuery, QueryBuilder};
pub use options::{BuilderOptions, PropertyOrder};
pub use params::Parameters;
pub use pattern::{node, node_ref, rel, Direction, NodePattern, Pattern, PatternPart, RelPattern};
pub use value::Value;
