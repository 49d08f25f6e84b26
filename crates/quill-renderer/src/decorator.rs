//! Renderer decorators.
//!
//! A decorator owns another renderer, calls it, and adjusts the returned
//! element. The wrapped renderer is never modified, so the same default can be
//! decorated differently in two registries.

use std::sync::Arc;

use crate::element::HtmlElement;
use crate::pipeline::Pipeline;
use crate::renderer::BlockRenderer;
use crate::tree::BlockNode;

/// Sets one attribute on the output of the wrapped renderer.
///
/// An existing value is overwritten, so the attribute always ends up with
/// exactly the configured value.
pub struct AttributeDecorator {
    inner: Arc<dyn BlockRenderer>,
    name: String,
    value: String,
}

impl AttributeDecorator {
    #[must_use]
    pub fn new(
        inner: Arc<dyn BlockRenderer>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            inner,
            name: name.into(),
            value: value.into(),
        }
    }

    /// Decorator that sets the `class` attribute.
    #[must_use]
    pub fn class(inner: Arc<dyn BlockRenderer>, class: impl Into<String>) -> Self {
        Self::new(inner, "class", class)
    }
}

impl BlockRenderer for AttributeDecorator {
    fn render(&self, node: &BlockNode, pipeline: &Pipeline) -> HtmlElement {
        let mut element = self.inner.render(node, pipeline);
        element.set_attribute(self.name.as_str(), self.value.as_str());
        element
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::defaults::{DefaultRenderers, TableRenderer};
    use crate::registry::RegistryBuilder;
    use crate::tree::{Alignment, BlockKind};

    struct StyledTable;

    impl BlockRenderer for StyledTable {
        fn render(&self, _node: &BlockNode, _pipeline: &Pipeline) -> HtmlElement {
            HtmlElement::new("table", "")
                .with_attribute("class", "grid striped")
                .with_attribute("id", "t")
        }
    }

    fn pipeline() -> Pipeline {
        let registry = RegistryBuilder::new(DefaultRenderers::builtin())
            .build()
            .unwrap();
        Pipeline::new(Arc::new(registry))
    }

    fn table() -> BlockNode {
        BlockNode::table(vec![BlockNode::table_row(vec![BlockNode::table_cell(
            "1",
            false,
            Alignment::None,
        )])])
    }

    #[test]
    fn test_adds_class_to_default_table() {
        let decorator = AttributeDecorator::class(Arc::new(TableRenderer), "table");
        let element = decorator.render(&table(), &pipeline());

        assert_eq!(element.attribute("class"), Some("table"));
        assert_eq!(
            element.to_html(),
            r#"<table class="table"><tbody><tr><td>1</td></tr></tbody></table>"#
        );
    }

    #[test]
    fn test_overwrites_existing_class() {
        let decorator = AttributeDecorator::class(Arc::new(StyledTable), "table");
        let element = decorator.render(&table(), &pipeline());

        assert_eq!(element.attribute("class"), Some("table"));
        assert_eq!(element.attribute("id"), Some("t"));
        assert_eq!(element.to_html(), r#"<table class="table" id="t"></table>"#);
    }

    #[test]
    fn test_inner_renderer_unchanged() {
        let inner: Arc<dyn BlockRenderer> = Arc::new(StyledTable);
        let decorator = AttributeDecorator::class(Arc::clone(&inner), "table");
        let pipeline = pipeline();

        let _ = decorator.render(&table(), &pipeline);
        let plain = inner.render(&table(), &pipeline);
        assert_eq!(plain.attribute("class"), Some("grid striped"));
    }

    #[test]
    fn test_decorated_default_through_registry() {
        let builder = RegistryBuilder::new(DefaultRenderers::builtin());
        let default_table = builder.default_renderer(BlockKind::Table).unwrap();
        let registry = builder
            .register(
                BlockKind::Table,
                Arc::new(AttributeDecorator::new(default_table, "data-kind", "grid")),
                10,
            )
            .build()
            .unwrap();
        let pipeline = Pipeline::new(Arc::new(registry));

        let mut out = String::new();
        pipeline.render_node(&table(), &mut out);
        assert!(out.starts_with(r#"<table data-kind="grid">"#));
    }
}
