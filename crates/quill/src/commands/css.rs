//! `quill css` command implementation.

use std::path::PathBuf;

use clap::Args;
use quill_config::{CliSettings, Config};
use quill_highlight::{HighlightError, available_themes, theme_css};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the css command.
#[derive(Args)]
pub(crate) struct CssArgs {
    /// Highlighting theme (overrides config).
    #[arg(long, env = "QUILL_THEME")]
    theme: Option<String>,

    /// Path to configuration file (default: auto-discover quill.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl CssArgs {
    /// Execute the css command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the theme is unknown.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            theme: self.theme,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let css = stylesheet(&config.highlight.theme)?;
        Output::new().document(&css)?;
        Ok(())
    }
}

/// Stylesheet for `theme`, listing the bundled themes when it is unknown.
fn stylesheet(theme: &str) -> Result<String, CliError> {
    theme_css(theme).map_err(|e| match e {
        HighlightError::UnknownTheme(theme) => CliError::UnknownTheme {
            theme,
            available: available_themes().join(", "),
        },
        other => CliError::Highlight(other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stylesheet_for_bundled_theme() {
        let css = stylesheet("InspiredGitHub").unwrap();
        assert!(css.contains(".hl-"));
    }

    #[test]
    fn test_unknown_theme_lists_available() {
        let err = stylesheet("no-such-theme").unwrap_err();
        assert!(matches!(err, CliError::UnknownTheme { .. }));

        let message = err.to_string();
        assert!(message.contains("no-such-theme"));
        assert!(message.contains("InspiredGitHub"));
        assert!(message.contains("base16-ocean.dark"));
    }
}
