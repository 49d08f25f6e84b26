//! Highlighting capability and its syntect implementation.

use syntect::highlighting::ThemeSet;
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::util::LinesWithEndings;

use quill_renderer::escape_html;

use crate::error::HighlightError;
use crate::language::{Language, SYNTAX_SET};

/// Prefix of the CSS classes on highlighted spans.
pub const CLASS_PREFIX: &str = "hl-";

/// Default stylesheet theme.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed {
    prefix: CLASS_PREFIX,
};

/// Turns raw text into highlighted, escaped HTML markup.
///
/// Implementations are treated as untrusted: returning an error or panicking
/// only degrades the affected block.
pub trait Highlighter: Send + Sync {
    /// Highlight `text` as `language`. The returned markup must be safe HTML.
    fn highlight(&self, text: &str, language: &Language) -> Result<String, HighlightError>;
}

impl<H: Highlighter + ?Sized> Highlighter for std::sync::Arc<H> {
    fn highlight(&self, text: &str, language: &Language) -> Result<String, HighlightError> {
        (**self).highlight(text, language)
    }
}

/// Highlighter backed by syntect's bundled grammars.
///
/// Produces `<span>` elements with classes prefixed by [`CLASS_PREFIX`];
/// pair it with [`theme_css`] for colors.
#[derive(Clone, Copy, Debug, Default)]
pub struct SyntectHighlighter;

impl SyntectHighlighter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, text: &str, language: &Language) -> Result<String, HighlightError> {
        if language.is_plaintext() {
            return Ok(escape_html(text));
        }

        let syntax = SYNTAX_SET
            .find_syntax_by_name(language.as_str())
            .or_else(|| SYNTAX_SET.find_syntax_by_token(language.as_str()))
            .ok_or_else(|| HighlightError::UnknownLanguage(language.to_string()))?;

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, CLASS_STYLE);
        for line in LinesWithEndings::from(text) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| HighlightError::Engine(e.to_string()))?;
        }
        Ok(generator.finalize())
    }
}

/// Stylesheet for a bundled syntect theme, matching [`SyntectHighlighter`] output.
///
/// # Errors
///
/// Returns [`HighlightError::UnknownTheme`] if the theme is not bundled.
pub fn theme_css(theme: &str) -> Result<String, HighlightError> {
    let themes = ThemeSet::load_defaults();
    let theme = themes
        .themes
        .get(theme)
        .ok_or_else(|| HighlightError::UnknownTheme(theme.to_owned()))?;
    css_for_theme_with_class_style(theme, CLASS_STYLE)
        .map_err(|e| HighlightError::Engine(e.to_string()))
}

/// Names of the bundled themes, sorted.
#[must_use]
pub fn available_themes() -> Vec<String> {
    let mut names: Vec<String> = ThemeSet::load_defaults().themes.into_keys().collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_highlight_rust() {
        let markup = SyntectHighlighter::new()
            .highlight("fn main() {}\n", &Language::new("Rust"))
            .unwrap();
        assert!(markup.contains(r#"<span class="hl-"#));
        assert!(markup.contains("main"));
    }

    #[test]
    fn test_highlight_escapes_markup() {
        let markup = SyntectHighlighter::new()
            .highlight("<b>bold</b>\n", &Language::new("HTML"))
            .unwrap();
        assert!(!markup.contains("<b>"));
        assert!(markup.contains("&lt;"));
    }

    #[test]
    fn test_plaintext_is_escaped_text() {
        let markup = SyntectHighlighter::new()
            .highlight("<b> & c", &Language::plaintext())
            .unwrap();
        assert_eq!(markup, "&lt;b&gt; &amp; c");
    }

    #[test]
    fn test_unknown_language_errors() {
        let result = SyntectHighlighter::new().highlight("x", &Language::new("Klingon"));
        assert!(matches!(result, Err(HighlightError::UnknownLanguage(name)) if name == "Klingon"));
    }

    #[test]
    fn test_theme_css() {
        let css = theme_css(DEFAULT_THEME).unwrap();
        assert!(css.contains(".hl-"));
    }

    #[test]
    fn test_unknown_theme() {
        assert!(matches!(
            theme_css("does-not-exist"),
            Err(HighlightError::UnknownTheme(_))
        ));
    }

    #[test]
    fn test_available_themes_include_default() {
        assert!(available_themes().iter().any(|t| t == DEFAULT_THEME));
    }
}
