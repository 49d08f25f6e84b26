//! Rendering engine bootstrap.
//!
//! [`Engine`] turns a [`Config`] into a frozen renderer registry and a
//! [`Pipeline`] around it:
//!
//! - the highlighting adapter replaces the default code block renderer for
//!   fenced and indented code at `highlight.priority`
//! - a class decorator wraps the default table renderer at `tables.priority`
//!
//! Bootstrap either succeeds completely or returns an [`EngineError`]; there is
//! no partially configured engine.
//!
//! # Example
//!
//! ```
//! use quill_config::Config;
//! use quill_core::Engine;
//!
//! let engine = Engine::bootstrap(&Config::default()).unwrap();
//! let html = engine.render_markdown("| a |\n|---|\n| 1 |\n");
//! assert!(html.starts_with(r#"<table class="table">"#));
//! ```

mod error;

use std::sync::Arc;

use quill_config::Config;
use quill_highlight::{
    HighlightRenderer, Highlighter, LanguageLookup, SyntectHighlighter, SyntectLookup,
};
use quill_renderer::{
    AttributeDecorator, BlockKind, BlockRenderer, DefaultRenderers, Document, Pipeline,
    RegistryBuilder, parse_markdown,
};

pub use error::EngineError;

/// A configured rendering pipeline.
#[derive(Clone)]
pub struct Engine {
    pipeline: Pipeline,
    gfm: bool,
}

impl Engine {
    /// Build an engine using syntect for highlighting.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the configuration is invalid or the registry
    /// cannot be built.
    pub fn bootstrap(config: &Config) -> Result<Self, EngineError> {
        let lookup = SyntectLookup::new().with_aliases(&config.highlight.aliases);
        Self::with_capabilities(config, SyntectHighlighter::new(), lookup)
    }

    /// Build an engine with a custom highlighter and language lookup.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the configuration is invalid or the registry
    /// cannot be built.
    pub fn with_capabilities<H, L>(
        config: &Config,
        highlighter: H,
        lookup: L,
    ) -> Result<Self, EngineError>
    where
        H: Highlighter + 'static,
        L: LanguageLookup + 'static,
    {
        config.validate()?;

        let mut builder = RegistryBuilder::new(DefaultRenderers::builtin());

        if config.highlight.enabled {
            let mut renderer =
                HighlightRenderer::new(highlighter, lookup).with_class(&config.highlight.class);
            if let Some(timeout) = config.highlight.timeout() {
                renderer = renderer.with_timeout(timeout);
            }
            let renderer: Arc<dyn BlockRenderer> = Arc::new(renderer);
            builder = builder
                .register(
                    BlockKind::FencedCode,
                    Arc::clone(&renderer),
                    config.highlight.priority,
                )
                .register(BlockKind::IndentedCode, renderer, config.highlight.priority);
        }

        if config.tables.enabled
            && let Some(table) = builder.default_renderer(BlockKind::Table)
        {
            builder = builder.register(
                BlockKind::Table,
                Arc::new(AttributeDecorator::class(table, &config.tables.class)),
                config.tables.priority,
            );
        }

        let registry = builder.build()?;
        tracing::info!(
            highlight = config.highlight.enabled,
            tables = config.tables.enabled,
            gfm = config.markdown.gfm,
            "Rendering engine ready"
        );

        Ok(Self {
            pipeline: Pipeline::new(Arc::new(registry)),
            gfm: config.markdown.gfm,
        })
    }

    /// The pipeline used for rendering.
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Render a block tree to HTML.
    #[must_use]
    pub fn render_document(&self, document: &Document) -> String {
        self.pipeline.render_document(document)
    }

    /// Parse markdown and render it to HTML.
    #[must_use]
    pub fn render_markdown(&self, markdown: &str) -> String {
        let document = parse_markdown(markdown, self.gfm);
        self.render_document(&document)
    }
}
