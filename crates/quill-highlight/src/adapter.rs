//! Code block renderer backed by a [`Highlighter`].

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use quill_renderer::{BlockKind, BlockNode, BlockRenderer, HtmlElement, Pipeline, escape_html};

use crate::error::HighlightError;
use crate::highlighter::Highlighter;
use crate::language::{Language, LanguageLookup};

/// Class set on every highlighted block.
pub const DEFAULT_CLASS: &str = "keylighter";

/// Default cap on helper threads alive at once when a timeout is set.
pub const DEFAULT_MAX_HELPERS: usize = 4;

/// Outcome of highlighting one block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighlightResult {
    pub language: Language,
    /// Safe HTML: highlighter markup, or escaped raw text after a failure.
    pub markup: String,
    /// Whether the highlighter failed and `markup` is the fallback.
    pub degraded: bool,
}

/// Renders fenced and indented code through a highlighter.
///
/// Output is always `<pre class="keylighter" data-language="...">`. The call
/// into the highlighter is the only fallible step; an error, a panic or a
/// missed deadline is logged and replaced by the escaped raw text. Each block
/// gets exactly one attempt.
pub struct HighlightRenderer<H, L> {
    highlighter: Arc<H>,
    lookup: L,
    class: String,
    timeout: Option<Duration>,
    max_helpers: usize,
    helpers: Arc<AtomicUsize>,
}

impl<H, L> HighlightRenderer<H, L>
where
    H: Highlighter + 'static,
    L: LanguageLookup,
{
    #[must_use]
    pub fn new(highlighter: H, lookup: L) -> Self {
        Self {
            highlighter: Arc::new(highlighter),
            lookup,
            class: DEFAULT_CLASS.to_owned(),
            timeout: None,
            max_helpers: DEFAULT_MAX_HELPERS,
            helpers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Use a different class on the `pre` element.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    /// Abandon highlighting calls that take longer than `timeout`.
    ///
    /// The call then runs on a helper thread. A call that overruns keeps
    /// running in the background until it returns; its result is discarded.
    /// At most [`with_max_helpers`](Self::with_max_helpers) helper threads
    /// exist at once. While all of them are busy, blocks fall back to plain
    /// text without calling the highlighter.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Cap the number of helper threads alive at once. Clamped to at least 1.
    #[must_use]
    pub fn with_max_helpers(mut self, max_helpers: usize) -> Self {
        self.max_helpers = max_helpers.max(1);
        self
    }

    /// Resolve a fence hint. Absent or blank hints are `plaintext`.
    #[must_use]
    pub fn resolve_language(&self, hint: Option<&str>) -> Language {
        match hint.map(str::trim) {
            Some(hint) if !hint.is_empty() => self.lookup.lookup(hint),
            _ => Language::plaintext(),
        }
    }

    /// Highlight raw text, containing any failure of the highlighter.
    #[must_use]
    pub fn highlight(&self, text: &str, hint: Option<&str>) -> HighlightResult {
        let language = self.resolve_language(hint);
        match self.invoke(text, &language) {
            Ok(markup) => HighlightResult {
                language,
                markup,
                degraded: false,
            },
            Err(e) => {
                tracing::warn!(
                    language = %language,
                    error = %e,
                    "Highlighting failed, rendering plain text"
                );
                HighlightResult {
                    language,
                    markup: escape_html(text),
                    degraded: true,
                }
            }
        }
    }

    /// Render raw text as a highlighted block element.
    #[must_use]
    pub fn render_code(&self, text: &str, hint: Option<&str>) -> HtmlElement {
        let result = self.highlight(text, hint);
        HtmlElement::new("pre", result.markup)
            .with_attribute("class", self.class.as_str())
            .with_attribute("data-language", result.language.as_str())
    }

    fn invoke(&self, text: &str, language: &Language) -> Result<String, HighlightError> {
        match self.timeout {
            Some(timeout) => self.invoke_with_deadline(text, language, timeout),
            None => contained(|| self.highlighter.highlight(text, language)),
        }
    }

    fn invoke_with_deadline(
        &self,
        text: &str,
        language: &Language,
        timeout: Duration,
    ) -> Result<String, HighlightError> {
        let slot = HelperSlot::acquire(&self.helpers, self.max_helpers)?;
        let (tx, rx) = mpsc::channel();
        let highlighter = Arc::clone(&self.highlighter);
        let text = text.to_owned();
        let language = language.clone();

        thread::Builder::new()
            .name("quill-highlight".to_owned())
            .spawn(move || {
                let result = contained(|| highlighter.highlight(&text, &language));
                // Free the slot before the caller can observe the result
                drop(slot);
                // Receiver is gone when the deadline has passed
                let _ = tx.send(result);
            })
            .map_err(|e| HighlightError::Engine(format!("Failed to spawn highlighter: {e}")))?;

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(HighlightError::TimedOut(timeout)),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(HighlightError::Engine(
                "Highlighter thread exited without a result".to_owned(),
            )),
        }
    }
}

impl<H, L> BlockRenderer for HighlightRenderer<H, L>
where
    H: Highlighter + 'static,
    L: LanguageLookup,
{
    fn render(&self, node: &BlockNode, _pipeline: &Pipeline) -> HtmlElement {
        // Indented code has no info string and always resolves to plaintext.
        let hint = match node.kind {
            BlockKind::FencedCode => node.language_hint(),
            _ => None,
        };
        self.render_code(&node.literal, hint)
    }
}

/// One reserved helper thread, released when the thread finishes.
struct HelperSlot(Arc<AtomicUsize>);

impl HelperSlot {
    fn acquire(helpers: &Arc<AtomicUsize>, max: usize) -> Result<Self, HighlightError> {
        helpers
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < max).then_some(n + 1)
            })
            .map(|_| Self(Arc::clone(helpers)))
            .map_err(|_| HighlightError::Saturated(max))
    }
}

impl Drop for HelperSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Run a highlighting call, turning a panic into an error.
fn contained<F>(call: F) -> Result<String, HighlightError>
where
    F: FnOnce() -> Result<String, HighlightError>,
{
    catch_unwind(AssertUnwindSafe(call))
        .unwrap_or_else(|payload| Err(HighlightError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;
    use quill_renderer::{Alignment, Document, RendererRegistry};

    use super::*;
    use crate::highlighter::SyntectHighlighter;
    use crate::language::SyntectLookup;

    static_assertions::assert_impl_all!(
        HighlightRenderer<SyntectHighlighter, SyntectLookup>: Send, Sync
    );

    /// Wraps text in a span naming the language.
    struct Echo;

    impl Highlighter for Echo {
        fn highlight(&self, text: &str, language: &Language) -> Result<String, HighlightError> {
            Ok(format!(
                r#"<span class="{language}">{}</span>"#,
                escape_html(text)
            ))
        }
    }

    struct Failing;

    impl Highlighter for Failing {
        fn highlight(&self, _text: &str, _language: &Language) -> Result<String, HighlightError> {
            Err(HighlightError::Engine("grammar exploded".to_owned()))
        }
    }

    struct Panicking;

    impl Highlighter for Panicking {
        fn highlight(&self, _text: &str, _language: &Language) -> Result<String, HighlightError> {
            panic!("internal crash in highlighter");
        }
    }

    struct Slow(Duration);

    impl Highlighter for Slow {
        fn highlight(&self, text: &str, _language: &Language) -> Result<String, HighlightError> {
            thread::sleep(self.0);
            Ok(text.to_owned())
        }
    }

    #[derive(Default)]
    struct Counting(AtomicUsize);

    impl Highlighter for Counting {
        fn highlight(&self, _text: &str, _language: &Language) -> Result<String, HighlightError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(HighlightError::Engine("always".to_owned()))
        }
    }

    struct MapLookup(HashMap<&'static str, &'static str>);

    impl MapLookup {
        fn new() -> Self {
            Self(HashMap::from([("rust", "rust"), ("js", "javascript")]))
        }
    }

    impl LanguageLookup for MapLookup {
        fn lookup(&self, hint: &str) -> Language {
            self.0
                .get(hint)
                .map_or_else(Language::plaintext, |id| Language::new(*id))
        }
    }

    fn pipeline() -> Pipeline {
        Pipeline::new(Arc::new(RendererRegistry::builtin()))
    }

    #[test]
    fn test_recognized_hint_is_highlighted() {
        let renderer = HighlightRenderer::new(Echo, MapLookup::new());
        let element = renderer.render(&BlockNode::fenced_code("rust", "let a = 1;"), &pipeline());
        assert_eq!(
            element.to_html(),
            r#"<pre class="keylighter" data-language="rust"><span class="rust">let a = 1;</span></pre>"#
        );
    }

    #[test]
    fn test_unrecognized_hint_matches_plaintext() {
        let renderer = HighlightRenderer::new(Echo, MapLookup::new());
        let pipeline = pipeline();
        let unknown = renderer.render(&BlockNode::fenced_code("cobol", "x"), &pipeline);
        let empty = renderer.render(&BlockNode::fenced_code("", "x"), &pipeline);
        let plain = renderer.render_code("x", Some(Language::PLAINTEXT));

        assert_eq!(unknown.attribute("data-language"), Some("plaintext"));
        assert_eq!(unknown, empty);
        assert_eq!(
            renderer.render_code("x", None),
            renderer.render_code("x", Some("  "))
        );
        assert_eq!(plain.attribute("data-language"), Some("plaintext"));
    }

    #[test]
    fn test_indented_code_is_plaintext() {
        let renderer = HighlightRenderer::new(Echo, MapLookup::new());
        let mut node = BlockNode::indented_code("x");
        // Stray info on an indented block is ignored
        node.info = Some("rust".to_owned());
        let element = renderer.render(&node, &pipeline());
        assert_eq!(element.attribute("data-language"), Some("plaintext"));
    }

    #[test]
    fn test_error_falls_back_to_escaped_text() {
        let renderer = HighlightRenderer::new(Failing, MapLookup::new());
        let result = renderer.highlight("<b>bold</b>", Some("rust"));

        assert!(result.degraded);
        assert_eq!(result.language, Language::new("rust"));
        assert_eq!(result.markup, "&lt;b&gt;bold&lt;/b&gt;");
    }

    #[test]
    fn test_panic_is_contained() {
        let renderer = HighlightRenderer::new(Panicking, MapLookup::new());
        let element = renderer.render(&BlockNode::fenced_code("js", "<b>"), &pipeline());
        assert_eq!(
            element.to_html(),
            r#"<pre class="keylighter" data-language="javascript">&lt;b&gt;</pre>"#
        );
    }

    #[test]
    fn test_single_attempt_per_block() {
        let counting = Arc::new(Counting::default());
        let renderer = HighlightRenderer::new(Arc::clone(&counting), MapLookup::new());
        let _ = renderer.highlight("x", Some("rust"));
        assert_eq!(counting.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_timeout_falls_back() {
        let renderer = HighlightRenderer::new(Slow(Duration::from_secs(2)), MapLookup::new())
            .with_timeout(Duration::from_millis(20));
        let result = renderer.highlight("<i>", Some("rust"));
        assert!(result.degraded);
        assert_eq!(result.markup, "&lt;i&gt;");
    }

    #[test]
    fn test_timeout_not_reached() {
        let renderer = HighlightRenderer::new(Echo, MapLookup::new())
            .with_timeout(Duration::from_secs(5));
        let result = renderer.highlight("a", Some("rust"));
        assert!(!result.degraded);
        assert_eq!(result.markup, r#"<span class="rust">a</span>"#);
    }

    #[test]
    fn test_timeout_with_panicking_highlighter() {
        let renderer = HighlightRenderer::new(Panicking, MapLookup::new())
            .with_timeout(Duration::from_secs(5));
        let result = renderer.highlight("a", Some("rust"));
        assert!(result.degraded);
        assert_eq!(result.markup, "a");
    }

    #[test]
    fn test_overrunning_helpers_are_capped() {
        let renderer = HighlightRenderer::new(Slow(Duration::from_millis(500)), MapLookup::new())
            .with_timeout(Duration::from_millis(10))
            .with_max_helpers(1);
        let language = Language::new("rust");

        assert!(matches!(
            renderer.invoke("a", &language),
            Err(HighlightError::TimedOut(_))
        ));
        // The first call is still running on the only helper thread
        assert!(matches!(
            renderer.invoke("b", &language),
            Err(HighlightError::Saturated(1))
        ));
        let result = renderer.highlight("<c>", Some("rust"));
        assert!(result.degraded);
        assert_eq!(result.markup, "&lt;c&gt;");
    }

    #[test]
    fn test_helper_slot_released_after_overrun() {
        let renderer = HighlightRenderer::new(Slow(Duration::from_millis(50)), MapLookup::new())
            .with_timeout(Duration::from_millis(5))
            .with_max_helpers(1);
        let language = Language::new("rust");

        assert!(matches!(
            renderer.invoke("a", &language),
            Err(HighlightError::TimedOut(_))
        ));
        thread::sleep(Duration::from_millis(400));
        assert!(matches!(
            renderer.invoke("b", &language),
            Err(HighlightError::TimedOut(_))
        ));
        assert_eq!(renderer.helpers.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_helper_slot_released_on_success() {
        let renderer = HighlightRenderer::new(Echo, MapLookup::new())
            .with_timeout(Duration::from_secs(5))
            .with_max_helpers(1);
        for _ in 0..3 {
            assert!(!renderer.highlight("a", Some("rust")).degraded);
        }
    }

    #[test]
    fn test_custom_class() {
        let renderer = HighlightRenderer::new(Echo, MapLookup::new()).with_class("code");
        let element = renderer.render_code("x", None);
        assert_eq!(element.attribute("class"), Some("code"));
    }

    #[test]
    fn test_syntect_end_to_end() {
        let renderer = HighlightRenderer::new(SyntectHighlighter::new(), SyntectLookup::new());
        let element = renderer.render(
            &BlockNode::fenced_code("rust", "fn main() {}\n"),
            &pipeline(),
        );
        assert_eq!(element.attribute("data-language"), Some("Rust"));
        assert!(element.content().contains("hl-"));
    }

    #[test]
    fn test_pipeline_with_failing_highlighter_renders_everything() {
        use quill_renderer::RegistryBuilder;
        use quill_renderer::DefaultRenderers;

        let adapter = Arc::new(HighlightRenderer::new(Failing, MapLookup::new()));
        let registry = RegistryBuilder::new(DefaultRenderers::builtin())
            .register(BlockKind::FencedCode, adapter, 150)
            .build()
            .unwrap();
        let pipeline = Pipeline::new(Arc::new(registry));

        let doc = Document::new(vec![
            BlockNode::fenced_code("rust", "<b>"),
            BlockNode::table(vec![BlockNode::table_row(vec![BlockNode::table_cell(
                "1",
                false,
                Alignment::None,
            )])]),
        ]);
        let html = pipeline.render_document(&doc);
        assert_eq!(
            html,
            concat!(
                r#"<pre class="keylighter" data-language="rust">&lt;b&gt;</pre>"#,
                "<table><tbody><tr><td>1</td></tr></tbody></table>"
            )
        );
    }
}
