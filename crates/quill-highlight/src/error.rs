//! Highlighting error types.

use std::time::Duration;

/// Error returned by a [`Highlighter`](crate::Highlighter).
///
/// None of these reach the caller of a document render: the adapter logs
/// them and falls back to escaped plain text.
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    /// The highlighter does not know the resolved language.
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),
    /// The highlighting engine reported an error.
    #[error("Highlighting engine error: {0}")]
    Engine(String),
    /// The highlighter panicked.
    #[error("Highlighter panicked: {0}")]
    Panicked(String),
    /// The highlighter did not finish before the deadline.
    #[error("Highlighting timed out after {0:?}")]
    TimedOut(Duration),
    /// Every helper thread is still busy with an earlier, overrunning call.
    #[error("All {0} highlighter threads are busy")]
    Saturated(usize),
    /// Requested stylesheet theme is not bundled.
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),
}
