//! Parameter table shared by every clause of a single builder.

use indexmap::{map::Iter, IndexMap};
use serde::{Serialize, Serializer};
use tracing::trace;

use crate::query::Value;
use crate::types::{QueryError, Result};

/// Prefix of parameters minted for pattern properties.
pub(crate) const PROPERTY_PREFIX: &str = "p";
/// Prefix of parameters minted for SET updates.
pub(crate) const SET_PREFIX: &str = "set";

/// Mapping from generated parameter name to the literal it stands in for.
///
/// A single counter mints the numeric suffix of every generated name, so two
/// elements carrying the same property key never share a parameter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parameters {
    values: IndexMap<String, Value>,
    counter: u64,
    max: Option<usize>,
}

impl Parameters {
    /// Creates an empty table without a size budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table that refuses to grow past `max` entries.
    pub fn with_limit(max: Option<usize>) -> Self {
        Self {
            max,
            ..Self::default()
        }
    }

    /// Looks up the literal bound to `name` (without the leading `$`).
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns true when `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of bound parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when no parameter is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates bindings in the order they were minted.
    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.values.iter()
    }

    /// Borrows the underlying map.
    pub fn as_map(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    /// Consumes the table and returns the underlying map.
    pub fn into_map(self) -> IndexMap<String, Value> {
        self.values
    }

    /// Mints `<prefix><stem>_<counter>`, inserts `value` under it and returns
    /// the name.
    pub(crate) fn bind_generated(&mut self, prefix: &str, stem: &str, value: Value) -> Result<String> {
        self.ensure_capacity()?;
        // Caller-bound names may already occupy a generated slot.
        let name = loop {
            let candidate = format!("{prefix}{stem}_{}", self.counter);
            self.counter += 1;
            if !self.values.contains_key(&candidate) {
                break candidate;
            }
        };
        trace!(param = %name, "parameter minted");
        self.values.insert(name.clone(), value);
        Ok(name)
    }

    /// Binds a caller-named parameter.
    pub(crate) fn bind_named(&mut self, name: &str, value: Value) -> Result<()> {
        if !is_identifier(name) {
            return Err(QueryError::InvalidParameterName {
                name: name.to_owned(),
            });
        }
        if self.values.contains_key(name) {
            return Err(QueryError::DuplicateParameter {
                name: name.to_owned(),
            });
        }
        self.ensure_capacity()?;
        trace!(param = %name, "parameter bound");
        self.values.insert(name.to_owned(), value);
        Ok(())
    }

    /// Marks the current table state for [`Parameters::rollback`].
    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            len: self.values.len(),
            counter: self.counter,
        }
    }

    /// Drops every binding minted after `mark`.
    pub(crate) fn rollback(&mut self, mark: Checkpoint) {
        if self.values.len() > mark.len {
            trace!(dropped = self.values.len() - mark.len, "parameters rolled back");
        }
        self.values.truncate(mark.len);
        self.counter = mark.counter;
    }

    fn ensure_capacity(&self) -> Result<()> {
        match self.max {
            Some(max) if self.values.len() >= max => Err(QueryError::TooManyParameters { max }),
            _ => Ok(()),
        }
    }
}

/// Table state captured before rendering a clause.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Checkpoint {
    len: usize,
    counter: u64,
}

impl Serialize for Parameters {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.values.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Drops every character of a property key that is not an ASCII letter or
/// digit (`last-seen` becomes `lastseen`).
pub(crate) fn property_stem(key: &str) -> String {
    key.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Replaces every character of a SET path that is not an ASCII letter or
/// digit with `_` (`u.status` becomes `u_status`).
pub(crate) fn set_stem(path: &str) -> String {
    path.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
