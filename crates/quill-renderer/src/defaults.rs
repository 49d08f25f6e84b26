//! Built-in default renderers.
//!
//! One renderer per [`BlockKind`]. They produce plain semantic HTML5 and are
//! registered at [`DEFAULT_PRIORITY`]; anything registered above that priority
//! replaces them.

use std::collections::HashMap;
use std::sync::Arc;

use crate::element::{HtmlElement, escape_html};
use crate::pipeline::Pipeline;
use crate::renderer::BlockRenderer;
use crate::tree::{BlockKind, BlockNode, Detail};

/// Priority of the built-in default renderers.
pub const DEFAULT_PRIORITY: i32 = 0;

/// Set of fallback renderers, one per block kind.
#[derive(Clone, Default)]
pub struct DefaultRenderers {
    renderers: HashMap<BlockKind, Arc<dyn BlockRenderer>>,
}

impl DefaultRenderers {
    /// An empty set. Building a registry from it fails until every kind is covered.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in HTML renderers for every [`BlockKind`].
    #[must_use]
    pub fn builtin() -> Self {
        let code: Arc<dyn BlockRenderer> = Arc::new(CodeBlockRenderer);
        let row: Arc<dyn BlockRenderer> = Arc::new(TableRowRenderer);

        Self::empty()
            .with(BlockKind::Paragraph, Arc::new(ParagraphRenderer))
            .with(BlockKind::Heading, Arc::new(HeadingRenderer))
            .with(BlockKind::BlockQuote, Arc::new(BlockQuoteRenderer))
            .with(BlockKind::List, Arc::new(ListRenderer))
            .with(BlockKind::ListItem, Arc::new(ListItemRenderer))
            .with(BlockKind::Text, Arc::new(TextRenderer))
            .with(BlockKind::FencedCode, Arc::clone(&code))
            .with(BlockKind::IndentedCode, code)
            .with(BlockKind::HtmlBlock, Arc::new(HtmlBlockRenderer))
            .with(BlockKind::ThematicBreak, Arc::new(ThematicBreakRenderer))
            .with(BlockKind::Table, Arc::new(TableRenderer))
            .with(BlockKind::TableHead, Arc::clone(&row))
            .with(BlockKind::TableRow, row)
            .with(BlockKind::TableCell, Arc::new(TableCellRenderer))
    }

    /// Set the default renderer for a kind, replacing any previous one.
    #[must_use]
    pub fn with(mut self, kind: BlockKind, renderer: Arc<dyn BlockRenderer>) -> Self {
        self.renderers.insert(kind, renderer);
        self
    }

    /// Remove the default renderer for a kind.
    #[must_use]
    pub fn without(mut self, kind: BlockKind) -> Self {
        self.renderers.remove(&kind);
        self
    }

    /// Get the default renderer for a kind.
    #[must_use]
    pub fn get(&self, kind: BlockKind) -> Option<&Arc<dyn BlockRenderer>> {
        self.renderers.get(&kind)
    }

    /// Kinds that have no default renderer, in [`BlockKind::ALL`] order.
    pub fn missing(&self) -> impl Iterator<Item = BlockKind> + '_ {
        BlockKind::ALL
            .into_iter()
            .filter(|kind| !self.renderers.contains_key(kind))
    }
}

/// `<p>` with the node's inline HTML.
pub struct ParagraphRenderer;

impl BlockRenderer for ParagraphRenderer {
    fn render(&self, node: &BlockNode, _pipeline: &Pipeline) -> HtmlElement {
        HtmlElement::new("p", node.literal.as_str())
    }
}

/// `<h1>`..`<h6>`.
pub struct HeadingRenderer;

impl BlockRenderer for HeadingRenderer {
    fn render(&self, node: &BlockNode, _pipeline: &Pipeline) -> HtmlElement {
        let level = match node.detail {
            Detail::Heading(level) => level.clamp(1, 6),
            _ => 1,
        };
        HtmlElement::new(format!("h{level}"), node.literal.as_str())
    }
}

pub struct BlockQuoteRenderer;

impl BlockRenderer for BlockQuoteRenderer {
    fn render(&self, node: &BlockNode, pipeline: &Pipeline) -> HtmlElement {
        HtmlElement::new("blockquote", pipeline.render_children(node))
    }
}

/// `<ul>`, or `<ol>` with a `start` attribute when it is not 1.
pub struct ListRenderer;

impl BlockRenderer for ListRenderer {
    fn render(&self, node: &BlockNode, pipeline: &Pipeline) -> HtmlElement {
        let items = pipeline.render_children(node);
        match node.detail {
            Detail::OrderedList(1) => HtmlElement::new("ol", items),
            Detail::OrderedList(start) => {
                HtmlElement::new("ol", items).with_attribute("start", start.to_string())
            }
            _ => HtmlElement::new("ul", items),
        }
    }
}

pub struct ListItemRenderer;

impl BlockRenderer for ListItemRenderer {
    fn render(&self, node: &BlockNode, pipeline: &Pipeline) -> HtmlElement {
        HtmlElement::new("li", pipeline.render_children(node))
    }
}

/// Inline run without a wrapping element.
pub struct TextRenderer;

impl BlockRenderer for TextRenderer {
    fn render(&self, node: &BlockNode, _pipeline: &Pipeline) -> HtmlElement {
        HtmlElement::fragment(node.literal.as_str())
    }
}

/// `<pre><code class="language-x">` with escaped content.
///
/// Used for both fenced and indented code; indented code never has a language.
pub struct CodeBlockRenderer;

impl BlockRenderer for CodeBlockRenderer {
    fn render(&self, node: &BlockNode, _pipeline: &Pipeline) -> HtmlElement {
        let mut code = HtmlElement::new("code", escape_html(&node.literal));
        if let Some(lang) = node.language_hint() {
            code.set_attribute("class", format!("language-{lang}"));
        }
        HtmlElement::new("pre", code.to_html())
    }
}

/// Raw HTML passed through verbatim.
pub struct HtmlBlockRenderer;

impl BlockRenderer for HtmlBlockRenderer {
    fn render(&self, node: &BlockNode, _pipeline: &Pipeline) -> HtmlElement {
        HtmlElement::fragment(node.literal.as_str())
    }
}

pub struct ThematicBreakRenderer;

impl BlockRenderer for ThematicBreakRenderer {
    fn render(&self, _node: &BlockNode, _pipeline: &Pipeline) -> HtmlElement {
        HtmlElement::void("hr")
    }
}

/// `<table>` with head rows in `<thead>` and other rows in `<tbody>`.
///
/// Children keep their order: each run of consecutive head or body rows gets
/// its own section.
pub struct TableRenderer;

impl BlockRenderer for TableRenderer {
    fn render(&self, node: &BlockNode, pipeline: &Pipeline) -> HtmlElement {
        let mut content = String::new();
        let mut section: Option<&str> = None;
        for child in &node.children {
            let wanted = if child.kind == BlockKind::TableHead {
                "thead"
            } else {
                "tbody"
            };
            if section != Some(wanted) {
                if let Some(open) = section {
                    close_section(&mut content, open);
                }
                content.push('<');
                content.push_str(wanted);
                content.push('>');
                section = Some(wanted);
            }
            pipeline.render_node(child, &mut content);
        }
        if let Some(open) = section {
            close_section(&mut content, open);
        }

        HtmlElement::new("table", content)
    }
}

fn close_section(out: &mut String, tag: &str) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// `<tr>` for both the head row and body rows.
pub struct TableRowRenderer;

impl BlockRenderer for TableRowRenderer {
    fn render(&self, node: &BlockNode, pipeline: &Pipeline) -> HtmlElement {
        HtmlElement::new("tr", pipeline.render_children(node))
    }
}

/// `<th>` or `<td>`, with `text-align` for aligned columns.
pub struct TableCellRenderer;

impl BlockRenderer for TableCellRenderer {
    fn render(&self, node: &BlockNode, _pipeline: &Pipeline) -> HtmlElement {
        let (header, align) = match node.detail {
            Detail::Cell { header, align } => (header, align),
            _ => (false, crate::tree::Alignment::None),
        };
        let mut cell = HtmlElement::new(if header { "th" } else { "td" }, node.literal.as_str());
        if let Some(css) = align.as_css() {
            cell.set_attribute("style", format!("text-align: {css}"));
        }
        cell
    }
}
