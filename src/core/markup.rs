//! Rich-text markup conversion for chat output.
//!
//! Markup expansion (`&6`, `&<selector: @s>`) is not implemented yet: text is
//! quoted and escaped as a plain JSON-ish string literal.

use tracing::warn;

/// Convert markup text into a quoted text component.
pub fn render(text: &str) -> String {
    warn!("advanced syntax conversion is currently WIP");
    format!("\"{}\"", text.replace('"', "\\\""))
}
