//! Command handlers for the Prism CLI.
//!
//! Each submodule owns one subcommand; `session` is the guided interactive
//! mode entered on bare invocation.

pub mod config;
pub mod interpret;
pub mod models;
pub mod session;

/// Truncate `text` to at most `max_chars` characters, on a char boundary.
///
/// Returns `None` when the text already fits. Input length is capped at the
/// presentation layer so the engine never sees over-long text.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> Option<String> {
    text.char_indices()
        .nth(max_chars)
        .map(|(byte_index, _)| text[..byte_index].to_string())
}
