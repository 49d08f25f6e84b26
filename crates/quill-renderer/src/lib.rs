//! Extensible block renderer for markdown documents.
//!
//! The crate renders an already-parsed block tree ([`Document`]) to HTML. Each
//! block kind is rendered by the [`BlockRenderer`] that wins in the
//! [`RendererRegistry`]: built-in defaults sit at priority `0`, and anything
//! registered above that replaces them.
//!
//! # Architecture
//!
//! - [`tree`]: the block tree handed over by a parser
//! - [`HtmlElement`]: what every renderer returns, serialized by the pipeline
//! - [`DefaultRenderers`]: fallback renderer for every [`BlockKind`]
//! - [`RegistryBuilder`] / [`RendererRegistry`]: priority-ordered selection,
//!   frozen after startup
//! - [`AttributeDecorator`]: post-processes the output of another renderer
//! - [`Pipeline`]: depth-first traversal and assembly
//!
//! [`parse_markdown`] builds a tree with `pulldown-cmark` for callers that
//! start from markdown text.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use quill_renderer::{
//!     AttributeDecorator, BlockKind, DefaultRenderers, Pipeline, RegistryBuilder,
//!     parse_markdown,
//! };
//!
//! let builder = RegistryBuilder::new(DefaultRenderers::builtin());
//! let table = builder.default_renderer(BlockKind::Table).unwrap();
//! let registry = builder
//!     .register(BlockKind::Table, Arc::new(AttributeDecorator::class(table, "table")), 10)
//!     .build()
//!     .unwrap();
//!
//! let pipeline = Pipeline::new(Arc::new(registry));
//! let html = pipeline.render_document(&parse_markdown("| A |\n|---|\n| 1 |", true));
//! assert!(html.starts_with(r#"<table class="table">"#));
//! ```

mod decorator;
mod defaults;
mod element;
mod markdown;
mod pipeline;
mod registry;
mod renderer;
pub mod tree;

pub use decorator::AttributeDecorator;
pub use defaults::{
    BlockQuoteRenderer, CodeBlockRenderer, DEFAULT_PRIORITY, DefaultRenderers, HeadingRenderer,
    HtmlBlockRenderer, ListItemRenderer, ListRenderer, ParagraphRenderer, TableCellRenderer,
    TableRenderer, TableRowRenderer, TextRenderer, ThematicBreakRenderer,
};
pub use element::{HtmlElement, escape_html};
pub use markdown::{parse_markdown, parser_options, tree_from_events};
pub use pipeline::Pipeline;
pub use registry::{RegistryBuilder, RegistryError, RendererRegistry};
pub use renderer::BlockRenderer;
pub use tree::{Alignment, BlockKind, BlockNode, Detail, Document};
