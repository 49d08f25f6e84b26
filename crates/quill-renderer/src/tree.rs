//! Block tree handed to the pipeline by a parser.
//!
//! The tree is plain data. The pipeline only reads it, so the same
//! [`Document`] can be rendered any number of times, from any thread.

/// Discriminator of a block node.
///
/// The registry is keyed by this type; every variant must have a built-in
/// default renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BlockKind {
    Paragraph,
    Heading,
    BlockQuote,
    List,
    ListItem,
    /// Inline run directly inside a container (tight list items).
    Text,
    FencedCode,
    IndentedCode,
    HtmlBlock,
    ThematicBreak,
    Table,
    TableHead,
    TableRow,
    TableCell,
}

impl BlockKind {
    /// Every representable block kind.
    pub const ALL: [Self; 14] = [
        Self::Paragraph,
        Self::Heading,
        Self::BlockQuote,
        Self::List,
        Self::ListItem,
        Self::Text,
        Self::FencedCode,
        Self::IndentedCode,
        Self::HtmlBlock,
        Self::ThematicBreak,
        Self::Table,
        Self::TableHead,
        Self::TableRow,
        Self::TableCell,
    ];

    /// Whether the `literal` of this kind is raw text rather than inline HTML.
    #[must_use]
    pub fn has_raw_literal(self) -> bool {
        matches!(
            self,
            Self::FencedCode | Self::IndentedCode | Self::HtmlBlock
        )
    }
}

/// Column alignment of a table cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    /// CSS `text-align` value, if any.
    #[must_use]
    pub fn as_css(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Left => Some("left"),
            Self::Center => Some("center"),
            Self::Right => Some("right"),
        }
    }
}

/// Kind-specific data that does not fit the common fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Detail {
    #[default]
    None,
    /// Heading level (1-6).
    Heading(u8),
    /// Ordered list with its start number.
    OrderedList(u64),
    /// Table cell position data.
    Cell { header: bool, align: Alignment },
}

/// A typed block of the document.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockNode {
    pub kind: BlockKind,
    /// Raw text for code and HTML blocks; safe inline HTML for paragraphs,
    /// headings, table cells and text runs. Empty for pure containers.
    #[cfg_attr(feature = "serde", serde(default))]
    pub literal: String,
    /// Fence info string. Only set on [`BlockKind::FencedCode`].
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub info: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub detail: Detail,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub children: Vec<BlockNode>,
}

impl BlockNode {
    fn leaf(kind: BlockKind, literal: impl Into<String>) -> Self {
        Self {
            kind,
            literal: literal.into(),
            info: None,
            detail: Detail::None,
            children: Vec::new(),
        }
    }

    fn container(kind: BlockKind, children: Vec<BlockNode>) -> Self {
        Self {
            kind,
            literal: String::new(),
            info: None,
            detail: Detail::None,
            children,
        }
    }

    /// Fenced code block. An empty info string is stored as `None`.
    #[must_use]
    pub fn fenced_code(info: impl Into<String>, text: impl Into<String>) -> Self {
        let info = info.into();
        Self {
            info: (!info.is_empty()).then_some(info),
            ..Self::leaf(BlockKind::FencedCode, text)
        }
    }

    #[must_use]
    pub fn indented_code(text: impl Into<String>) -> Self {
        Self::leaf(BlockKind::IndentedCode, text)
    }

    #[must_use]
    pub fn paragraph(inline_html: impl Into<String>) -> Self {
        Self::leaf(BlockKind::Paragraph, inline_html)
    }

    /// Heading; `level` is clamped to 1-6.
    #[must_use]
    pub fn heading(level: u8, inline_html: impl Into<String>) -> Self {
        Self {
            detail: Detail::Heading(level.clamp(1, 6)),
            ..Self::leaf(BlockKind::Heading, inline_html)
        }
    }

    #[must_use]
    pub fn text(inline_html: impl Into<String>) -> Self {
        Self::leaf(BlockKind::Text, inline_html)
    }

    #[must_use]
    pub fn html_block(html: impl Into<String>) -> Self {
        Self::leaf(BlockKind::HtmlBlock, html)
    }

    #[must_use]
    pub fn thematic_break() -> Self {
        Self::leaf(BlockKind::ThematicBreak, "")
    }

    #[must_use]
    pub fn block_quote(children: Vec<BlockNode>) -> Self {
        Self::container(BlockKind::BlockQuote, children)
    }

    /// List; `start` is `Some` for ordered lists.
    #[must_use]
    pub fn list(start: Option<u64>, items: Vec<BlockNode>) -> Self {
        Self {
            detail: start.map_or(Detail::None, Detail::OrderedList),
            ..Self::container(BlockKind::List, items)
        }
    }

    #[must_use]
    pub fn list_item(children: Vec<BlockNode>) -> Self {
        Self::container(BlockKind::ListItem, children)
    }

    /// Table; children are an optional [`table_head`](Self::table_head) followed by rows.
    #[must_use]
    pub fn table(children: Vec<BlockNode>) -> Self {
        Self::container(BlockKind::Table, children)
    }

    #[must_use]
    pub fn table_head(cells: Vec<BlockNode>) -> Self {
        Self::container(BlockKind::TableHead, cells)
    }

    #[must_use]
    pub fn table_row(cells: Vec<BlockNode>) -> Self {
        Self::container(BlockKind::TableRow, cells)
    }

    #[must_use]
    pub fn table_cell(inline_html: impl Into<String>, header: bool, align: Alignment) -> Self {
        Self {
            detail: Detail::Cell { header, align },
            ..Self::leaf(BlockKind::TableCell, inline_html)
        }
    }

    /// Language hint of a fenced code block: the first word of the info string.
    #[must_use]
    pub fn language_hint(&self) -> Option<&str> {
        self.info.as_deref()?.split_whitespace().next()
    }
}

/// Root of a block tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    pub blocks: Vec<BlockNode>,
}

impl Document {
    #[must_use]
    pub fn new(blocks: Vec<BlockNode>) -> Self {
        Self { blocks }
    }

    /// Count nodes of the whole tree, depth-first.
    #[must_use]
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[BlockNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.blocks)
    }
}

impl From<Vec<BlockNode>> for Document {
    fn from(blocks: Vec<BlockNode>) -> Self {
        Self::new(blocks)
    }
}
