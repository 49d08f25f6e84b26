//! CLI error types.

use std::path::PathBuf;

use quill_config::ConfigError;
use quill_core::EngineError;
use quill_highlight::HighlightError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Engine(#[from] EngineError),

    #[error("{0}")]
    Highlight(#[from] HighlightError),

    #[error("Unknown theme {theme:?}, available themes: {available}")]
    UnknownTheme { theme: String, available: String },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid block tree in {input}: {source}")]
    Tree {
        input: String,
        source: serde_json::Error,
    },
}
