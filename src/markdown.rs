//! Markdown rendering for assistant replies.
//!
//! This module converts the small Markdown subset chat replies use (code
//! fences, headings, emphasis, inline code, links, flat lists, paragraphs)
//! into an HTML fragment. The output is not trusted: raw HTML in the input
//! passes through and must go through [`crate::sanitize`] before display.

mod renderer;
mod slots;

pub use renderer::render_markdown;
