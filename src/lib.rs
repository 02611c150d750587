//! Parameterized Cypher query builder.
//!
//! Queries are assembled from node and relationship patterns and clause
//! groups; literal values are moved into a parameter table so they never
//! appear in the query text.
//!
//! ```
//! use sombra_cypher::{props, query::{node, QueryBuilder}};
//!
//! let query = QueryBuilder::new()
//!     .create(node("u", "User").with_properties(props! { "name" => "Alice", "age" => 30 }))
//!     .r#return(["u"])
//!     .finish()
//!     .expect("valid query");
//! assert_eq!(query.text, "CREATE (u:User {name: $pname_0, age: $page_1})\nRETURN u");
//! assert_eq!(query.params.len(), 2);
//! ```

#![warn(missing_docs)]

pub mod cli;
pub mod query;
pub mod types;

pub use query::{CypherQuery, QueryBuilder};
pub use types::{QueryError, Result};
