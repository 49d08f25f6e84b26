//! Priority-ordered mapping from block kind to renderer.
//!
//! # Resolution order
//!
//! For each [`BlockKind`] the registration with the strictly highest priority
//! wins. Among equal priorities the earliest registration wins. Built-in
//! defaults sit at [`DEFAULT_PRIORITY`] and count as registered before any
//! override, so an override needs a priority above `0` to replace a default.
//!
//! The registry is assembled with [`RegistryBuilder`] during startup and is
//! immutable afterwards. [`RendererRegistry::resolve`] is a plain map read and
//! can be called from any number of threads without locking.

use std::collections::HashMap;
use std::sync::Arc;

use crate::defaults::{DEFAULT_PRIORITY, DefaultRenderers};
use crate::renderer::BlockRenderer;
use crate::tree::BlockKind;

/// Error raised while building a registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A representable block kind has no default renderer.
    #[error("No default renderer for block kind {0:?}")]
    MissingDefault(BlockKind),
}

/// One `register` call.
struct Registration {
    kind: BlockKind,
    priority: i32,
    renderer: Arc<dyn BlockRenderer>,
}

/// Collects registrations during bootstrap.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use quill_renderer::{
///     AttributeDecorator, BlockKind, DefaultRenderers, RegistryBuilder,
/// };
///
/// let builder = RegistryBuilder::new(DefaultRenderers::builtin());
/// let table = builder.default_renderer(BlockKind::Table).unwrap();
/// let registry = builder
///     .register(
///         BlockKind::Table,
///         Arc::new(AttributeDecorator::class(table, "table")),
///         10,
///     )
///     .build()
///     .unwrap();
///
/// assert!(registry.is_overridden(BlockKind::Table));
/// ```
pub struct RegistryBuilder {
    defaults: DefaultRenderers,
    registrations: Vec<Registration>,
}

impl RegistryBuilder {
    /// Start a builder with the given fallback renderers.
    #[must_use]
    pub fn new(defaults: DefaultRenderers) -> Self {
        Self {
            defaults,
            registrations: Vec::new(),
        }
    }

    /// Register a renderer for a kind. Always succeeds.
    #[must_use]
    pub fn register(
        mut self,
        kind: BlockKind,
        renderer: Arc<dyn BlockRenderer>,
        priority: i32,
    ) -> Self {
        self.registrations.push(Registration {
            kind,
            priority,
            renderer,
        });
        self
    }

    /// The default renderer for a kind, for wrapping in a decorator.
    #[must_use]
    pub fn default_renderer(&self, kind: BlockKind) -> Option<Arc<dyn BlockRenderer>> {
        self.defaults.get(kind).map(Arc::clone)
    }

    /// Resolve every kind and freeze the registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MissingDefault`] for the first kind (in
    /// [`BlockKind::ALL`] order) without a default renderer, even when an
    /// override exists for it.
    pub fn build(self) -> Result<RendererRegistry, RegistryError> {
        if let Some(kind) = self.defaults.missing().next() {
            return Err(RegistryError::MissingDefault(kind));
        }

        let mut active = HashMap::with_capacity(BlockKind::ALL.len());
        for kind in BlockKind::ALL {
            let winner = self
                .registrations
                .iter()
                .filter(|r| r.kind == kind && r.priority > DEFAULT_PRIORITY)
                .fold(None::<&Registration>, |best, r| match best {
                    Some(b) if b.priority >= r.priority => Some(b),
                    _ => Some(r),
                });

            let entry = match winner {
                Some(registration) => {
                    tracing::debug!(
                        kind = ?kind,
                        priority = registration.priority,
                        "Renderer override registered"
                    );
                    Resolved {
                        renderer: Arc::clone(&registration.renderer),
                        priority: registration.priority,
                        overridden: true,
                    }
                }
                None => Resolved {
                    renderer: self
                        .default_renderer(kind)
                        .ok_or(RegistryError::MissingDefault(kind))?,
                    priority: DEFAULT_PRIORITY,
                    overridden: false,
                },
            };
            active.insert(kind, entry);
        }

        Ok(RendererRegistry { active })
    }
}

struct Resolved {
    renderer: Arc<dyn BlockRenderer>,
    priority: i32,
    overridden: bool,
}

/// Immutable registry of active renderers.
pub struct RendererRegistry {
    active: HashMap<BlockKind, Resolved>,
}

impl RendererRegistry {
    /// Registry with only the built-in defaults.
    #[must_use]
    pub fn builtin() -> Self {
        let defaults = DefaultRenderers::builtin();
        let active = BlockKind::ALL
            .into_iter()
            .filter_map(|kind| {
                defaults.get(kind).map(|renderer| {
                    (
                        kind,
                        Resolved {
                            renderer: Arc::clone(renderer),
                            priority: DEFAULT_PRIORITY,
                            overridden: false,
                        },
                    )
                })
            })
            .collect();
        Self { active }
    }

    /// The renderer with the highest priority for `kind`.
    #[must_use]
    pub fn resolve(&self, kind: BlockKind) -> &dyn BlockRenderer {
        // Every kind is populated by `build`.
        &*self.active[&kind].renderer
    }

    /// Priority of the active renderer for `kind`.
    #[must_use]
    pub fn priority(&self, kind: BlockKind) -> i32 {
        self.active[&kind].priority
    }

    /// Whether an override replaced the default for `kind`.
    #[must_use]
    pub fn is_overridden(&self, kind: BlockKind) -> bool {
        self.active[&kind].overridden
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::element::HtmlElement;
    use crate::pipeline::Pipeline;
    use crate::tree::BlockNode;

    static_assertions::assert_impl_all!(super::RendererRegistry: Send, Sync);

    struct Tagged(&'static str);

    impl BlockRenderer for Tagged {
        fn render(&self, _node: &BlockNode, _pipeline: &Pipeline) -> HtmlElement {
            HtmlElement::fragment(self.0)
        }
    }

    fn resolved_output(registry: RendererRegistry, node: &BlockNode) -> String {
        let pipeline = Pipeline::new(Arc::new(registry));
        let mut out = String::new();
        pipeline.render_node(node, &mut out);
        out
    }

    #[test]
    fn test_default_when_no_override() {
        let registry = RegistryBuilder::new(DefaultRenderers::builtin())
            .build()
            .unwrap();
        for kind in BlockKind::ALL {
            assert!(!registry.is_overridden(kind));
            assert_eq!(registry.priority(kind), DEFAULT_PRIORITY);
        }
        assert_eq!(
            resolved_output(registry, &BlockNode::paragraph("x")),
            "<p>x</p>"
        );
    }

    #[test]
    fn test_override_at_150_wins() {
        let registry = RegistryBuilder::new(DefaultRenderers::builtin())
            .register(BlockKind::FencedCode, Arc::new(Tagged("custom")), 150)
            .build()
            .unwrap();
        assert!(registry.is_overridden(BlockKind::FencedCode));
        assert_eq!(registry.priority(BlockKind::FencedCode), 150);
        assert_eq!(
            resolved_output(registry, &BlockNode::fenced_code("rust", "x")),
            "custom"
        );
    }

    #[test]
    fn test_highest_priority_wins_regardless_of_order() {
        let registry = RegistryBuilder::new(DefaultRenderers::builtin())
            .register(BlockKind::Table, Arc::new(Tagged("low")), 10)
            .register(BlockKind::Table, Arc::new(Tagged("high")), 200)
            .register(BlockKind::Table, Arc::new(Tagged("mid")), 50)
            .build()
            .unwrap();
        assert_eq!(
            resolved_output(registry, &BlockNode::table(vec![])),
            "high"
        );
    }

    #[test]
    fn test_tie_resolves_to_earliest_registration() {
        let registry = RegistryBuilder::new(DefaultRenderers::builtin())
            .register(BlockKind::Heading, Arc::new(Tagged("first")), 100)
            .register(BlockKind::Heading, Arc::new(Tagged("second")), 100)
            .build()
            .unwrap();
        assert_eq!(
            resolved_output(registry, &BlockNode::heading(1, "x")),
            "first"
        );
    }

    #[test]
    fn test_override_at_default_priority_loses_to_default() {
        let registry = RegistryBuilder::new(DefaultRenderers::builtin())
            .register(BlockKind::Paragraph, Arc::new(Tagged("zero")), 0)
            .register(BlockKind::Paragraph, Arc::new(Tagged("negative")), -5)
            .build()
            .unwrap();
        assert!(!registry.is_overridden(BlockKind::Paragraph));
        assert_eq!(
            resolved_output(registry, &BlockNode::paragraph("x")),
            "<p>x</p>"
        );
    }

    #[test]
    fn test_override_only_affects_its_kind() {
        let registry = RegistryBuilder::new(DefaultRenderers::builtin())
            .register(BlockKind::FencedCode, Arc::new(Tagged("custom")), 150)
            .build()
            .unwrap();
        assert!(!registry.is_overridden(BlockKind::IndentedCode));
        assert_eq!(
            resolved_output(registry, &BlockNode::indented_code("x")),
            "<pre><code>x</code></pre>"
        );
    }

    #[test]
    fn test_missing_default_is_fatal() {
        let result = RegistryBuilder::new(DefaultRenderers::builtin().without(BlockKind::Table))
            .build();
        assert!(matches!(
            result,
            Err(RegistryError::MissingDefault(BlockKind::Table))
        ));
    }

    #[test]
    fn test_missing_default_fatal_even_with_override() {
        let result =
            RegistryBuilder::new(DefaultRenderers::builtin().without(BlockKind::FencedCode))
                .register(BlockKind::FencedCode, Arc::new(Tagged("custom")), 150)
                .build();
        assert!(matches!(
            result,
            Err(RegistryError::MissingDefault(BlockKind::FencedCode))
        ));
    }

    #[test]
    fn test_empty_defaults_report_first_kind() {
        let result = RegistryBuilder::new(DefaultRenderers::empty()).build();
        let err = result.err().unwrap();
        assert_eq!(
            err.to_string(),
            "No default renderer for block kind Paragraph"
        );
    }

    #[test]
    fn test_builtin_registry_matches_built_defaults() {
        let registry = RendererRegistry::builtin();
        for kind in BlockKind::ALL {
            assert!(!registry.is_overridden(kind));
        }
    }
}
