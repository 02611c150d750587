#![forbid(unsafe_code)]

//! Command-line interface support.
//!
//! The `cli` binary is a thin argument parser over these functions.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// CLI configuration file handling.
pub mod config;

/// Rendering of query documents.
pub mod render;

/// Output layout for rendered queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Query text followed by the parameter table.
    #[default]
    Text,
    /// Single JSON object with `query` and `params`.
    Json,
}
