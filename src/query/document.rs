//! Declarative query documents.
//!
//! A document is an ordered list of builder steps that can be written in TOML
//! or JSON and replayed onto a [`QueryBuilder`]:
//!
//! ```toml
//! [[steps]]
//! op = "create"
//! pattern = [{ kind = "node", alias = "u", label = "User", props = { name = "Alice" } }]
//!
//! [[steps]]
//! op = "return"
//! aliases = ["u"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::query::{
    pattern::{Direction, NodePattern, Pattern, PatternPart, RelPattern},
    QueryBuilder, Value,
};

/// Failure to load a query document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The file could not be read.
    #[error("failed to read query document {path}: {source}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// TOML input did not match the document schema.
    #[error("invalid TOML query document: {0}")]
    Toml(#[from] toml::de::Error),
    /// JSON input did not match the document schema.
    #[error("invalid JSON query document: {0}")]
    Json(#[from] serde_json::Error),
    /// The file extension is neither `.toml` nor `.json`.
    #[error("unsupported query document format: {path} (expected .toml or .json)")]
    UnknownFormat {
        /// File that was requested.
        path: PathBuf,
    },
}

/// Ordered list of builder steps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryDocument {
    /// Steps replayed in order.
    #[serde(default, alias = "step")]
    pub steps: Vec<Step>,
}

/// One builder call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// `MATCH` clause.
    Match {
        /// Elements rendered back to back.
        pattern: Vec<Element>,
    },
    /// `OPTIONAL MATCH` clause.
    OptionalMatch {
        /// Elements rendered back to back.
        pattern: Vec<Element>,
    },
    /// `CREATE` clause.
    Create {
        /// Elements rendered back to back.
        pattern: Vec<Element>,
    },
    /// `MERGE` clause.
    Merge {
        /// Elements rendered back to back.
        pattern: Vec<Element>,
    },
    /// `SET` assignments.
    Set {
        /// Property path to literal.
        updates: IndexMap<String, Value>,
    },
    /// `DELETE` clause.
    Delete {
        /// Aliases to delete.
        aliases: Vec<String>,
    },
    /// `DETACH DELETE` clause.
    DetachDelete {
        /// Aliases to delete.
        aliases: Vec<String>,
    },
    /// `RETURN` aliases.
    Return {
        /// Aliases to return.
        aliases: Vec<String>,
    },
    /// Caller-named parameters.
    Params {
        /// Parameter name to literal.
        params: IndexMap<String, Value>,
    },
}

/// Serialized pattern element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    /// Node element; omit `label` to reference a bound alias.
    Node {
        /// Node alias.
        alias: String,
        /// Optional label.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        /// Literal properties.
        #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
        props: IndexMap<String, Value>,
    },
    /// Relationship element.
    Rel {
        /// Relationship alias; empty for an anonymous relationship.
        #[serde(default)]
        alias: String,
        /// Optional relationship type.
        #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
        rel_type: Option<String>,
        /// Direction relative to the preceding node.
        #[serde(default)]
        direction: Direction,
        /// Literal properties.
        #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
        props: IndexMap<String, Value>,
    },
}

impl From<Element> for PatternPart {
    fn from(element: Element) -> Self {
        match element {
            Element::Node {
                alias,
                label,
                props,
            } => NodePattern::new(alias, label).with_properties(props).into(),
            Element::Rel {
                alias,
                rel_type,
                direction,
                props,
            } => RelPattern::new(alias, rel_type)
                .with_direction(direction)
                .with_properties(props)
                .into(),
        }
    }
}

fn to_pattern(elements: Vec<Element>) -> Pattern {
    elements.into_iter().map(PatternPart::from).collect()
}

impl Step {
    /// Applies the step to `builder`.
    pub fn apply(self, builder: QueryBuilder) -> QueryBuilder {
        match self {
            Step::Match { pattern } => builder.r#match(to_pattern(pattern)),
            Step::OptionalMatch { pattern } => builder.optional_match(to_pattern(pattern)),
            Step::Create { pattern } => builder.create(to_pattern(pattern)),
            Step::Merge { pattern } => builder.merge(to_pattern(pattern)),
            Step::Set { updates } => builder.set(updates),
            Step::Delete { aliases } => builder.delete(aliases),
            Step::DetachDelete { aliases } => builder.detach_delete(aliases),
            Step::Return { aliases } => builder.r#return(aliases),
            Step::Params { params } => builder.with_params(params),
        }
    }
}

impl QueryDocument {
    /// Parses a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, DocumentError> {
        Ok(toml::from_str(input)?)
    }

    /// Parses a JSON document.
    pub fn from_json_str(input: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Reads a document, picking the format from the file extension.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let contents = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            _ => Err(DocumentError::UnknownFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Replays every step onto `builder`.
    pub fn apply(self, builder: QueryBuilder) -> QueryBuilder {
        self.steps.into_iter().enumerate().fold(builder, |builder, (idx, step)| {
            trace!(step = idx, "applying document step");
            step.apply(builder)
        })
    }
}
