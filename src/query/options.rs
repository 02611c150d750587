use serde::{Deserialize, Serialize};

/// Order in which property blocks and SET updates are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyOrder {
    /// Keep the order in which the caller supplied the entries.
    #[default]
    Insertion,
    /// Sort entries lexicographically by key.
    Sorted,
}

/// Tuning knobs for a [`QueryBuilder`](crate::query::QueryBuilder).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuilderOptions {
    /// Rendering order of property entries.
    pub property_order: PropertyOrder,
    /// Upper bound on bound parameters; `None` disables the check.
    pub max_parameters: Option<usize>,
}

impl BuilderOptions {
    /// Returns the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the property rendering order.
    pub fn property_order(mut self, order: PropertyOrder) -> Self {
        self.property_order = order;
        self
    }

    /// Caps the number of parameters a builder may bind.
    pub fn max_parameters(mut self, max: usize) -> Self {
        self.max_parameters = Some(max);
        self
    }
}
