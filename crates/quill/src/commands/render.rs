//! `quill render` command implementation.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use quill_config::{CliSettings, Config};
use quill_core::Engine;
use quill_renderer::Document;
use rayon::prelude::*;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Files to render. Reads stdin when omitted.
    paths: Vec<PathBuf>,

    /// Inputs are JSON block trees instead of markdown.
    #[arg(long)]
    tree: bool,

    /// Path to configuration file (default: auto-discover quill.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render code blocks without highlighting.
    #[arg(long)]
    no_highlight: bool,

    /// Highlighting theme (overrides config).
    #[arg(long, env = "QUILL_THEME")]
    theme: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or any input cannot be read or
    /// parsed. Nothing is written when one input fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            highlight_enabled: self.no_highlight.then_some(false),
            theme: self.theme,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let engine = Engine::bootstrap(&config)?;

        let rendered = if self.paths.is_empty() {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            vec![render_source(&engine, &source, self.tree, "<stdin>")?]
        } else {
            tracing::info!(files = self.paths.len(), "Rendering files");
            self.paths
                .par_iter()
                .map(|path| render_file(&engine, path, self.tree))
                .collect::<Result<Vec<_>, _>>()?
        };

        for html in &rendered {
            output.document(html)?;
        }
        Ok(())
    }
}

fn render_file(engine: &Engine, path: &Path, tree: bool) -> Result<String, CliError> {
    let source = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    render_source(engine, &source, tree, &path.display().to_string())
}

/// Render one input, either markdown or a serialized [`Document`].
fn render_source(
    engine: &Engine,
    source: &str,
    tree: bool,
    input: &str,
) -> Result<String, CliError> {
    if tree {
        let document: Document =
            serde_json::from_str(source).map_err(|source| CliError::Tree {
                input: input.to_owned(),
                source,
            })?;
        tracing::info!(input, nodes = document.node_count(), "Rendering block tree");
        Ok(engine.render_document(&document))
    } else {
        Ok(engine.render_markdown(source))
    }
}
