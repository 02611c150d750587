//! Fluent Cypher query builder.
//!
//! Each clause method renders its input right away and appends the text to
//! one clause group. [`QueryBuilder::build`] stitches the groups together in a
//! fixed order (MATCH, MERGE, CREATE, SET, DELETE, RETURN) no matter in which
//! order the methods were called.
//!
//! The first error a builder records is sticky: every later clause call is a
//! no-op and every later `build` reports the same error.

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::query::{
    options::{BuilderOptions, PropertyOrder},
    params::{set_stem, Parameters, SET_PREFIX},
    pattern::Pattern,
    Value,
};
use crate::types::{QueryError, Result};

#[derive(Clone, Copy, Debug)]
enum ClauseGroup {
    Match,
    Merge,
    Create,
    Delete,
}

/// Accumulates clauses and parameters for a single query.
///
/// Not synchronized: share it across threads only behind your own lock.
#[derive(Clone, Debug, Default)]
pub struct QueryBuilder {
    matches: Vec<String>,
    merges: Vec<String>,
    creates: Vec<String>,
    sets: Vec<String>,
    deletes: Vec<String>,
    returns: Vec<String>,
    params: Parameters,
    options: BuilderOptions,
    error: Option<QueryError>,
}

impl QueryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::with_options(BuilderOptions::default())
    }

    /// Creates an empty builder with explicit options.
    pub fn with_options(options: BuilderOptions) -> Self {
        Self {
            params: Parameters::with_limit(options.max_parameters),
            options,
            ..Self::default()
        }
    }

    /// Adds a `MATCH` clause.
    pub fn r#match(self, pattern: impl Into<Pattern>) -> Self {
        self.push_pattern(ClauseGroup::Match, "MATCH", pattern.into())
    }

    /// Adds an `OPTIONAL MATCH` clause.
    pub fn optional_match(self, pattern: impl Into<Pattern>) -> Self {
        self.push_pattern(ClauseGroup::Match, "OPTIONAL MATCH", pattern.into())
    }

    /// Adds a `CREATE` clause.
    pub fn create(self, pattern: impl Into<Pattern>) -> Self {
        self.push_pattern(ClauseGroup::Create, "CREATE", pattern.into())
    }

    /// Adds a `MERGE` clause.
    pub fn merge(self, pattern: impl Into<Pattern>) -> Self {
        self.push_pattern(ClauseGroup::Merge, "MERGE", pattern.into())
    }

    /// Adds `path = $param` assignments to the single `SET` line.
    ///
    /// Paths are written verbatim (`u.status`); only the values go through the
    /// parameter table.
    pub fn set<I, K, V>(mut self, updates: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        if self.error.is_some() {
            return self;
        }
        let mut updates: Vec<(String, Value)> = updates
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        if self.options.property_order == PropertyOrder::Sorted {
            updates.sort_by(|a, b| a.0.cmp(&b.0));
        }
        let mark = self.params.checkpoint();
        let mut assignments = Vec::with_capacity(updates.len());
        for (path, value) in updates {
            let name = match self.params.bind_generated(SET_PREFIX, &set_stem(&path), value) {
                Ok(name) => name,
                Err(err) => {
                    self.params.rollback(mark);
                    self.record_error(err);
                    return self;
                }
            };
            trace!(path = %path, param = %name, "set assignment appended");
            assignments.push(format!("{path} = ${name}"));
        }
        self.sets.extend(assignments);
        self
    }

    /// Adds a `DELETE` clause for the given aliases.
    pub fn delete<I, S>(self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_aliases("DELETE", aliases)
    }

    /// Adds a `DETACH DELETE` clause for the given aliases.
    pub fn detach_delete<I, S>(self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_aliases("DETACH DELETE", aliases)
    }

    /// Appends aliases to the `RETURN` line; repeated calls accumulate.
    pub fn r#return<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.error.is_some() {
            return self;
        }
        self.returns.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Binds caller-named parameters, e.g. for values referenced from
    /// hand-written fragments.
    ///
    /// Names must be plain identifiers and may not already be bound.
    pub fn with_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        if self.error.is_some() {
            return self;
        }
        for (name, value) in params {
            let name = name.into();
            if let Err(err) = self.params.bind_named(&name, value.into()) {
                self.record_error(err);
                return self;
            }
        }
        self
    }

    /// Error recorded so far, if any.
    pub fn error(&self) -> Option<&QueryError> {
        self.error.as_ref()
    }

    /// Parameters bound so far.
    ///
    /// A clause rejected mid-render leaves no bindings behind.
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Options the builder was created with.
    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    /// Assembles the query text.
    ///
    /// Fails with the recorded error, or with [`QueryError::Malformed`] (which
    /// then becomes sticky) when no MATCH, CREATE, or MERGE clause was added.
    /// The parameter table is lent, not copied.
    pub fn build(&mut self) -> Result<BuiltQuery<'_>> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        if self.matches.is_empty() && self.creates.is_empty() && self.merges.is_empty() {
            self.record_error(QueryError::Malformed);
            return Err(QueryError::Malformed);
        }
        let text = self.assemble();
        debug!(
            clauses = self.matches.len() + self.merges.len() + self.creates.len() + self.deletes.len(),
            params = self.params.len(),
            "query assembled"
        );
        Ok(BuiltQuery {
            text,
            params: &self.params,
        })
    }

    /// Assembles the query and hands over ownership of the parameters.
    pub fn finish(mut self) -> Result<CypherQuery> {
        let text = self.build()?.text;
        Ok(CypherQuery {
            text,
            params: self.params,
        })
    }

    fn push_pattern(mut self, group: ClauseGroup, keyword: &str, pattern: Pattern) -> Self {
        if self.error.is_some() {
            return self;
        }
        let mut clause = String::from(keyword);
        clause.push(' ');
        let mark = self.params.checkpoint();
        if let Err(err) = pattern.render_into(&mut clause, &mut self.params, self.options.property_order) {
            self.params.rollback(mark);
            self.record_error(err);
            return self;
        }
        trace!(?group, clause = %clause, "clause appended");
        self.group_mut(group).push(clause);
        self
    }

    fn push_aliases<I, S>(mut self, keyword: &str, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.error.is_some() {
            return self;
        }
        let aliases: Vec<String> = aliases.into_iter().map(Into::into).collect();
        let clause = format!("{keyword} {}", aliases.join(", "));
        trace!(clause = %clause, "clause appended");
        self.group_mut(ClauseGroup::Delete).push(clause);
        self
    }

    fn group_mut(&mut self, group: ClauseGroup) -> &mut Vec<String> {
        match group {
            ClauseGroup::Match => &mut self.matches,
            ClauseGroup::Merge => &mut self.merges,
            ClauseGroup::Create => &mut self.creates,
            ClauseGroup::Delete => &mut self.deletes,
        }
    }

    fn record_error(&mut self, err: QueryError) {
        if self.error.is_none() {
            warn!(code = err.code(), "query builder rejected input: {err}");
            self.error = Some(err);
        }
    }

    fn assemble(&self) -> String {
        let mut text = String::new();
        for clause in self
            .matches
            .iter()
            .chain(&self.merges)
            .chain(&self.creates)
        {
            text.push_str(clause);
            text.push('\n');
        }
        if !self.sets.is_empty() {
            text.push_str("SET ");
            text.push_str(&self.sets.join(", "));
            text.push('\n');
        }
        for clause in &self.deletes {
            text.push_str(clause);
            text.push('\n');
        }
        if !self.returns.is_empty() {
            text.push_str("RETURN ");
            text.push_str(&self.returns.join(", "));
        }
        text.trim().to_owned()
    }
}

/// Query text together with a borrowed view of its parameters.
#[derive(Debug, Serialize)]
pub struct BuiltQuery<'a> {
    /// Newline-separated clause text.
    #[serde(rename = "query")]
    pub text: String,
    /// Parameter table owned by the builder.
    pub params: &'a Parameters,
}

impl BuiltQuery<'_> {
    /// Copies the parameters into an owned query.
    pub fn to_owned_query(&self) -> CypherQuery {
        CypherQuery {
            text: self.text.clone(),
            params: self.params.clone(),
        }
    }
}

/// Owned query text and parameters, ready to hand to a driver.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CypherQuery {
    /// Newline-separated clause text.
    #[serde(rename = "query")]
    pub text: String,
    /// Parameter table.
    pub params: Parameters,
}
