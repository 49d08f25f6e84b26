//! Document rendering pipeline.

use std::sync::Arc;

use crate::registry::RendererRegistry;
use crate::tree::{BlockNode, Document};

/// Walks a block tree and dispatches every node to its registered renderer.
///
/// Traversal is depth-first in document order. The pipeline holds no mutable
/// state: all intermediate output lives in the call, so one pipeline can
/// render many documents concurrently.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use quill_renderer::{BlockNode, Document, Pipeline, RendererRegistry};
///
/// let pipeline = Pipeline::new(Arc::new(RendererRegistry::builtin()));
/// let doc = Document::new(vec![
///     BlockNode::heading(1, "Hello"),
///     BlockNode::paragraph("World"),
/// ]);
/// assert_eq!(pipeline.render_document(&doc), "<h1>Hello</h1><p>World</p>");
/// ```
#[derive(Clone)]
pub struct Pipeline {
    registry: Arc<RendererRegistry>,
}

impl Pipeline {
    #[must_use]
    pub fn new(registry: Arc<RendererRegistry>) -> Self {
        Self { registry }
    }

    /// The registry used for dispatch.
    #[must_use]
    pub fn registry(&self) -> &RendererRegistry {
        &self.registry
    }

    /// Render a whole document to HTML.
    #[must_use]
    pub fn render_document(&self, document: &Document) -> String {
        tracing::trace!(blocks = document.blocks.len(), "Rendering document");
        self.render_nodes(&document.blocks)
    }

    /// Render a sequence of sibling nodes in order.
    #[must_use]
    pub fn render_nodes(&self, nodes: &[BlockNode]) -> String {
        let mut out = String::with_capacity(nodes.len() * 64);
        for node in nodes {
            self.render_node(node, &mut out);
        }
        out
    }

    /// Render the children of a composite node.
    #[must_use]
    pub fn render_children(&self, node: &BlockNode) -> String {
        self.render_nodes(&node.children)
    }

    /// Render one node through the registry and append it to `out`.
    pub fn render_node(&self, node: &BlockNode, out: &mut String) {
        self.registry
            .resolve(node.kind)
            .render(node, self)
            .write_to(out);
    }
}
