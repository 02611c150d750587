use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use super::OutputFormat;
use crate::query::{document::DocumentError, document::QueryDocument, BuilderOptions, QueryBuilder};
use crate::types::{QueryError, QueryErrorWithCode};

/// Inputs for rendering a query document.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// TOML or JSON query document.
    pub document: PathBuf,
    /// Builder options to apply.
    pub options: BuilderOptions,
    /// Output layout.
    pub format: OutputFormat,
}

/// Errors surfaced by the CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The query document could not be loaded.
    #[error(transparent)]
    Document(#[from] DocumentError),
    /// The builder rejected the document.
    #[error(transparent)]
    Query(#[from] QueryError),
    /// The CLI configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] super::config::ConfigError),
    /// Output serialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// No config directory could be determined for this user.
    #[error("no config directory available; pass --config")]
    NoConfigDir,
}

impl CliError {
    /// Message printed by the binary; builder errors carry their code.
    pub fn report(&self) -> String {
        match self {
            CliError::Query(err) => QueryErrorWithCode(err).to_string(),
            other => other.to_string(),
        }
    }
}

/// Builds the document and formats the query for printing.
pub fn run_render(cfg: &RenderConfig) -> Result<String, CliError> {
    let doc = QueryDocument::load(&cfg.document)?;
    info!(path = %cfg.document.display(), steps = doc.steps.len(), "rendering query document");
    let query = doc
        .apply(QueryBuilder::with_options(cfg.options.clone()))
        .finish()?;
    let output = match cfg.format {
        OutputFormat::Json => serde_json::to_string_pretty(&query)?,
        OutputFormat::Text => {
            let params = serde_json::to_string_pretty(&query.params)?;
            format!("{}\n\nparams: {params}", query.text)
        }
    };
    Ok(output)
}
