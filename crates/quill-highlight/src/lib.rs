//! Syntax highlighting for code blocks.
//!
//! [`HighlightRenderer`] is a [`BlockRenderer`](quill_renderer::BlockRenderer)
//! for fenced and indented code. It resolves the fence hint through a
//! [`LanguageLookup`], hands the raw text to a [`Highlighter`], and wraps the
//! result in `<pre class="keylighter">`. The highlighter is treated as
//! best-effort: errors and panics degrade the block to escaped plain text
//! instead of failing the document.
//!
//! [`SyntectHighlighter`] and [`SyntectLookup`] implement both capabilities
//! with syntect's bundled grammars; [`theme_css`] produces the matching
//! stylesheet.
//!
//! # Example
//!
//! ```
//! use quill_highlight::{HighlightRenderer, SyntectHighlighter, SyntectLookup};
//!
//! let renderer = HighlightRenderer::new(SyntectHighlighter::new(), SyntectLookup::new());
//! let html = renderer.render_code("let x = 1;\n", Some("rust")).to_html();
//! assert!(html.starts_with(r#"<pre class="keylighter" data-language="Rust">"#));
//! ```

mod adapter;
mod error;
mod highlighter;
mod language;

pub use adapter::{DEFAULT_CLASS, DEFAULT_MAX_HELPERS, HighlightRenderer, HighlightResult};
pub use error::HighlightError;
pub use highlighter::{
    CLASS_PREFIX, DEFAULT_THEME, Highlighter, SyntectHighlighter, available_themes, theme_css,
};
pub use language::{Language, LanguageLookup, SyntectLookup};
