//! Block tree construction from `pulldown-cmark` events.
//!
//! Block structure maps onto [`BlockNode`]s. Inline runs are not modelled as
//! nodes: they are rendered to safe HTML with `pulldown_cmark::html` and stored
//! in the owning node's `literal`.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::tree::{Alignment, BlockKind, BlockNode, Document};

/// Parser options for the given GFM setting.
///
/// GFM enables tables, strikethrough and task lists.
#[must_use]
pub fn parser_options(gfm: bool) -> Options {
    if gfm {
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
    } else {
        Options::empty()
    }
}

/// Parse markdown text into a block tree.
///
/// # Example
///
/// ```
/// use quill_renderer::{BlockKind, parse_markdown};
///
/// let doc = parse_markdown("# Title\n\n```rust\nfn main() {}\n```\n", true);
/// assert_eq!(doc.blocks[0].kind, BlockKind::Heading);
/// assert_eq!(doc.blocks[1].kind, BlockKind::FencedCode);
/// assert_eq!(doc.blocks[1].literal, "fn main() {}\n");
/// ```
#[must_use]
pub fn parse_markdown(markdown: &str, gfm: bool) -> Document {
    tree_from_events(Parser::new_ext(markdown, parser_options(gfm)))
}

/// Build a block tree from an event stream.
pub fn tree_from_events<'a, I>(events: I) -> Document
where
    I: IntoIterator<Item = Event<'a>>,
{
    let mut builder = TreeBuilder::default();
    for event in events {
        builder.event(event);
    }
    builder.finish()
}

#[derive(Default)]
struct TreeBuilder<'a> {
    blocks: Vec<BlockNode>,
    stack: Vec<BlockNode>,
    inline: Vec<Event<'a>>,
    alignments: Vec<Alignment>,
    in_table_head: bool,
    cell_index: usize,
}

impl<'a> TreeBuilder<'a> {
    fn event(&mut self, event: Event<'a>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) | Event::Html(text) if self.in_raw_block() => {
                if let Some(node) = self.stack.last_mut() {
                    node.literal.push_str(&text);
                }
            }
            Event::Rule => {
                self.flush_inline();
                self.append(BlockNode::thematic_break());
            }
            other => self.inline.push(other),
        }
    }

    fn start(&mut self, tag: Tag<'a>) {
        match tag {
            Tag::Paragraph => self.open(BlockNode::paragraph("")),
            Tag::Heading { level, .. } => {
                self.open(BlockNode::heading(heading_level_to_num(level), ""));
            }
            Tag::BlockQuote(_) => self.open(BlockNode::block_quote(Vec::new())),
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => {
                self.open(BlockNode::fenced_code(info.trim(), ""));
            }
            Tag::CodeBlock(CodeBlockKind::Indented) => self.open(BlockNode::indented_code("")),
            Tag::HtmlBlock => self.open(BlockNode::html_block("")),
            Tag::List(start) => self.open(BlockNode::list(start, Vec::new())),
            Tag::Item => self.open(BlockNode::list_item(Vec::new())),
            Tag::Table(alignments) => {
                self.alignments = alignments.into_iter().map(convert_alignment).collect();
                self.open(BlockNode::table(Vec::new()));
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.cell_index = 0;
                self.open(BlockNode::table_head(Vec::new()));
            }
            Tag::TableRow => {
                self.cell_index = 0;
                self.open(BlockNode::table_row(Vec::new()));
            }
            Tag::TableCell => {
                let align = self
                    .alignments
                    .get(self.cell_index)
                    .copied()
                    .unwrap_or_default();
                self.open(BlockNode::table_cell("", self.in_table_head, align));
            }
            // Not enabled by `parser_options`
            Tag::FootnoteDefinition(_)
            | Tag::MetadataBlock(_)
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition => {}
            inline => self.inline.push(Event::Start(inline)),
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::TableCell => {
                self.close();
                self.cell_index += 1;
            }
            TagEnd::TableHead => {
                self.close();
                self.in_table_head = false;
            }
            TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::BlockQuote(_)
            | TagEnd::CodeBlock
            | TagEnd::HtmlBlock
            | TagEnd::List(_)
            | TagEnd::Item
            | TagEnd::Table
            | TagEnd::TableRow => self.close(),
            TagEnd::FootnoteDefinition
            | TagEnd::MetadataBlock(_)
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition => {}
            inline => self.inline.push(Event::End(inline)),
        }
    }

    fn in_raw_block(&self) -> bool {
        self.stack
            .last()
            .is_some_and(|node| node.kind.has_raw_literal())
    }

    fn open(&mut self, node: BlockNode) {
        self.flush_inline();
        self.stack.push(node);
    }

    fn close(&mut self) {
        self.flush_inline();
        if let Some(node) = self.stack.pop() {
            self.append(node);
        }
    }

    fn append(&mut self, node: BlockNode) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.blocks.push(node),
        }
    }

    /// Render pending inline events into the current leaf, or into a text run
    /// when the current node is a container.
    fn flush_inline(&mut self) {
        if self.inline.is_empty() {
            return;
        }

        let mut html = String::new();
        pulldown_cmark::html::push_html(&mut html, self.inline.drain(..));

        match self.stack.last_mut() {
            Some(node) if collects_inline(node.kind) => node.literal.push_str(&html),
            _ => self.append(BlockNode::text(html)),
        }
    }

    fn finish(mut self) -> Document {
        self.flush_inline();
        while !self.stack.is_empty() {
            self.close();
        }
        Document::new(self.blocks)
    }
}

fn collects_inline(kind: BlockKind) -> bool {
    matches!(
        kind,
        BlockKind::Paragraph | BlockKind::Heading | BlockKind::TableCell | BlockKind::Text
    )
}

fn convert_alignment(align: pulldown_cmark::Alignment) -> Alignment {
    match align {
        pulldown_cmark::Alignment::None => Alignment::None,
        pulldown_cmark::Alignment::Left => Alignment::Left,
        pulldown_cmark::Alignment::Center => Alignment::Center,
        pulldown_cmark::Alignment::Right => Alignment::Right,
    }
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
