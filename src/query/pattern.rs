//! Node and relationship fragments of a graph pattern.
//!
//! Every element renders itself into query text and moves its literal
//! properties into the builder's [`Parameters`], leaving only `$name`
//! references behind.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::query::{
    options::PropertyOrder,
    params::{property_stem, Parameters, PROPERTY_PREFIX},
    Value,
};
use crate::types::Result;

/// Property map attached to a node or relationship.
pub type Properties = IndexMap<String, Value>;

/// Direction of a relationship relative to the element before it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// `-[...]-`
    #[default]
    Undirected,
    /// `-[...]->`
    Outgoing,
    /// `<-[...]-`
    Incoming,
}

impl Direction {
    fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            Direction::Undirected => ("-", "-"),
            Direction::Outgoing => ("-", "->"),
            Direction::Incoming => ("<-", "-"),
        }
    }
}

/// Node element such as `(u:User {name: $pname_0})`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodePattern {
    alias: String,
    label: Option<String>,
    props: Properties,
}

impl NodePattern {
    /// Creates a node with an optional label.
    pub fn new(alias: impl Into<String>, label: Option<String>) -> Self {
        Self {
            alias: alias.into(),
            label,
            props: Properties::new(),
        }
    }

    /// Replaces the property map.
    pub fn with_properties<I, K, V>(mut self, props: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.props = collect_props(props);
        self
    }

    /// Adds a single property, replacing any previous value for `key`.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Starts a longer pattern with this node.
    pub fn then(self, part: impl Into<PatternPart>) -> Pattern {
        Pattern::from(self).then(part)
    }

    /// Alias used to reference the node.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Label, if one is asserted.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Properties carried by the node.
    pub fn properties(&self) -> &Properties {
        &self.props
    }

    /// Renders the node, binding its properties into `params`.
    pub fn render(&self, params: &mut Parameters) -> Result<String> {
        let mut out = String::new();
        self.render_into(&mut out, params, PropertyOrder::Insertion)?;
        Ok(out)
    }

    pub(crate) fn render_into(
        &self,
        out: &mut String,
        params: &mut Parameters,
        order: PropertyOrder,
    ) -> Result<()> {
        out.push('(');
        out.push_str(&self.alias);
        push_annotation(out, self.label.as_deref());
        render_props(out, &self.props, params, order)?;
        out.push(')');
        Ok(())
    }
}

/// Relationship element such as `-[r:KNOWS {since: $psince_1}]->`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RelPattern {
    alias: String,
    rel_type: Option<String>,
    direction: Direction,
    props: Properties,
}

impl RelPattern {
    /// Creates an undirected relationship with an optional type.
    pub fn new(alias: impl Into<String>, rel_type: Option<String>) -> Self {
        Self {
            alias: alias.into(),
            rel_type,
            direction: Direction::Undirected,
            props: Properties::new(),
        }
    }

    /// Replaces the property map.
    pub fn with_properties<I, K, V>(mut self, props: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.props = collect_props(props);
        self
    }

    /// Adds a single property, replacing any previous value for `key`.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Sets the direction explicitly.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Points the relationship away from the preceding node (`-[...]->`).
    pub fn outgoing(self) -> Self {
        self.with_direction(Direction::Outgoing)
    }

    /// Points the relationship at the preceding node (`<-[...]-`).
    pub fn incoming(self) -> Self {
        self.with_direction(Direction::Incoming)
    }

    /// Starts a longer pattern with this relationship.
    pub fn then(self, part: impl Into<PatternPart>) -> Pattern {
        Pattern::from(self).then(part)
    }

    /// Alias used to reference the relationship; empty when anonymous.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Relationship type, if one is asserted.
    pub fn rel_type(&self) -> Option<&str> {
        self.rel_type.as_deref()
    }

    /// Current direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Properties carried by the relationship.
    pub fn properties(&self) -> &Properties {
        &self.props
    }

    /// Renders the relationship, binding its properties into `params`.
    pub fn render(&self, params: &mut Parameters) -> Result<String> {
        let mut out = String::new();
        self.render_into(&mut out, params, PropertyOrder::Insertion)?;
        Ok(out)
    }

    pub(crate) fn render_into(
        &self,
        out: &mut String,
        params: &mut Parameters,
        order: PropertyOrder,
    ) -> Result<()> {
        let (left, right) = self.direction.delimiters();
        out.push_str(left);
        out.push('[');
        out.push_str(&self.alias);
        push_annotation(out, self.rel_type.as_deref());
        render_props(out, &self.props, params, order)?;
        out.push(']');
        out.push_str(right);
        Ok(())
    }
}

/// Creates a labeled node.
pub fn node(alias: impl Into<String>, label: impl Into<String>) -> NodePattern {
    NodePattern::new(alias, Some(label.into()))
}

/// References an already bound node by alias only.
pub fn node_ref(alias: impl Into<String>) -> NodePattern {
    NodePattern::new(alias, None)
}

/// Creates an undirected, typed relationship.
pub fn rel(alias: impl Into<String>, rel_type: impl Into<String>) -> RelPattern {
    RelPattern::new(alias, Some(rel_type.into()))
}

/// Either half of a pattern.
#[derive(Clone, Debug, PartialEq)]
pub enum PatternPart {
    /// Node element.
    Node(NodePattern),
    /// Relationship element.
    Rel(RelPattern),
}

impl PatternPart {
    pub(crate) fn render_into(
        &self,
        out: &mut String,
        params: &mut Parameters,
        order: PropertyOrder,
    ) -> Result<()> {
        match self {
            PatternPart::Node(node) => node.render_into(out, params, order),
            PatternPart::Rel(rel) => rel.render_into(out, params, order),
        }
    }
}

impl From<NodePattern> for PatternPart {
    fn from(node: NodePattern) -> Self {
        PatternPart::Node(node)
    }
}

impl From<RelPattern> for PatternPart {
    fn from(rel: RelPattern) -> Self {
        PatternPart::Rel(rel)
    }
}

/// Sequence of elements rendered back to back.
///
/// Nothing checks that nodes and relationships alternate; the parts are
/// concatenated exactly as supplied.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pattern {
    parts: Vec<PatternPart>,
}

impl Pattern {
    /// Creates an empty pattern.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an element.
    pub fn then(mut self, part: impl Into<PatternPart>) -> Self {
        self.parts.push(part.into());
        self
    }

    /// Elements in render order.
    pub fn parts(&self) -> &[PatternPart] {
        &self.parts
    }

    /// Returns true when the pattern has no elements.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub(crate) fn render_into(
        &self,
        out: &mut String,
        params: &mut Parameters,
        order: PropertyOrder,
    ) -> Result<()> {
        for part in &self.parts {
            part.render_into(out, params, order)?;
        }
        Ok(())
    }
}

impl From<NodePattern> for Pattern {
    fn from(node: NodePattern) -> Self {
        Pattern::new().then(node)
    }
}

impl From<RelPattern> for Pattern {
    fn from(rel: RelPattern) -> Self {
        Pattern::new().then(rel)
    }
}

impl From<PatternPart> for Pattern {
    fn from(part: PatternPart) -> Self {
        Pattern::new().then(part)
    }
}

impl From<Vec<PatternPart>> for Pattern {
    fn from(parts: Vec<PatternPart>) -> Self {
        Self { parts }
    }
}

impl<const N: usize> From<[PatternPart; N]> for Pattern {
    fn from(parts: [PatternPart; N]) -> Self {
        Self {
            parts: parts.into(),
        }
    }
}

impl FromIterator<PatternPart> for Pattern {
    fn from_iter<I: IntoIterator<Item = PatternPart>>(iter: I) -> Self {
        Self {
            parts: iter.into_iter().collect(),
        }
    }
}

/// Builds a `[(&str, Value); N]` property list from mixed literal types.
///
/// ```
/// use sombra_cypher::{props, query::node};
/// let user = node("u", "User").with_properties(props! { "name" => "Alice", "age" => 30 });
/// assert_eq!(user.properties().len(), 2);
/// ```
#[macro_export]
macro_rules! props {
    ($($key:expr => $value:expr),* $(,)?) => {
        [$(($key, $crate::query::Value::from($value))),*]
    };
}

fn collect_props<I, K, V>(props: I) -> Properties
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    props
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

fn push_annotation(out: &mut String, name: Option<&str>) {
    if let Some(name) = name.filter(|name| !name.is_empty()) {
        out.push(':');
        out.push_str(name);
    }
}

fn render_props(
    out: &mut String,
    props: &Properties,
    params: &mut Parameters,
    order: PropertyOrder,
) -> Result<()> {
    if props.is_empty() {
        return Ok(());
    }
    let mut entries: Vec<(&String, &Value)> = props.iter().collect();
    if order == PropertyOrder::Sorted {
        entries.sort_by(|a, b| a.0.cmp(b.0));
    }
    out.push_str(" {");
    for (idx, (key, value)) in entries.into_iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        let name = params.bind_generated(PROPERTY_PREFIX, &property_stem(key), value.clone())?;
        out.push_str(key);
        out.push_str(": $");
        out.push_str(&name);
    }
    out.push('}');
    Ok(())
}
