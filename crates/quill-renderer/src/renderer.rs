//! Block renderer capability.

use std::sync::Arc;

use crate::element::HtmlElement;
use crate::pipeline::Pipeline;
use crate::tree::BlockNode;

/// Converts one block node into an [`HtmlElement`].
///
/// Renderers are shared between threads once the registry is built, so they
/// must be `Send + Sync` and must not depend on per-call mutable state.
/// Composite kinds render their children through the `pipeline` argument,
/// which dispatches every child back through the registry.
///
/// # Example
///
/// ```
/// use quill_renderer::{BlockNode, BlockRenderer, HtmlElement, Pipeline};
///
/// struct Shout;
///
/// impl BlockRenderer for Shout {
///     fn render(&self, node: &BlockNode, _pipeline: &Pipeline) -> HtmlElement {
///         HtmlElement::new("p", node.literal.to_uppercase())
///     }
/// }
/// ```
pub trait BlockRenderer: Send + Sync {
    /// Render a node.
    fn render(&self, node: &BlockNode, pipeline: &Pipeline) -> HtmlElement;
}

impl<R: BlockRenderer + ?Sized> BlockRenderer for Arc<R> {
    fn render(&self, node: &BlockNode, pipeline: &Pipeline) -> HtmlElement {
        (**self).render(node, pipeline)
    }
}

impl<R: BlockRenderer + ?Sized> BlockRenderer for Box<R> {
    fn render(&self, node: &BlockNode, pipeline: &Pipeline) -> HtmlElement {
        (**self).render(node, pipeline)
    }
}
