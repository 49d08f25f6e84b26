//! Language identifiers and hint resolution.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use syntect::parsing::SyntaxSet;

/// Syntax definitions bundled with syntect, loaded once per process.
pub(crate) static SYNTAX_SET: LazyLock<SyntaxSet> =
    LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Name of syntect's plain text syntax.
const SYNTECT_PLAIN_TEXT: &str = "Plain Text";

/// A language identifier recognized by a highlighter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Language(String);

impl Language {
    /// Reserved identifier for absent, empty or unrecognized hints.
    pub const PLAINTEXT: &'static str = "plaintext";

    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn plaintext() -> Self {
        Self::new(Self::PLAINTEXT)
    }

    #[must_use]
    pub fn is_plaintext(&self) -> bool {
        self.0 == Self::PLAINTEXT
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps a fence hint to a language identifier.
///
/// Must never fail: unknown hints map to [`Language::plaintext`].
pub trait LanguageLookup: Send + Sync {
    fn lookup(&self, hint: &str) -> Language;
}

/// Resolves hints against syntect's bundled syntax definitions.
///
/// The first word of the hint is lowercased and passed through the alias
/// table, then matched against syntax tokens (file extensions) and names.
/// The resulting identifier is the syntect syntax name, e.g. `Rust`.
#[derive(Clone, Debug, Default)]
pub struct SyntectLookup {
    aliases: HashMap<String, String>,
}

impl SyntectLookup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add hint aliases (`sh` -> `bash`). Keys are matched case-insensitively.
    #[must_use]
    pub fn with_aliases<I, K, V>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.aliases.extend(
            aliases
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_lowercase(), v.into())),
        );
        self
    }
}

impl LanguageLookup for SyntectLookup {
    fn lookup(&self, hint: &str) -> Language {
        let Some(word) = hint.split_whitespace().next() else {
            return Language::plaintext();
        };
        let word = word.to_lowercase();
        let token = self.aliases.get(&word).map_or(word.as_str(), String::as_str);

        if token == Language::PLAINTEXT {
            return Language::plaintext();
        }

        let syntax = SYNTAX_SET
            .find_syntax_by_token(token)
            .or_else(|| SYNTAX_SET.find_syntax_by_name(token));

        match syntax {
            Some(syntax) if syntax.name != SYNTECT_PLAIN_TEXT => Language::new(&syntax.name),
            _ => Language::plaintext(),
        }
    }
}
