//! Markdown rendering and allowlist sanitization for chat clients.

pub mod assets;
pub mod components;
mod config;
mod markdown;
mod message;
mod sanitize;
mod util;

pub use components::layout::Stylesheet;
pub use components::transcript::{message_row, transcript_page};
pub use config::Config;
pub use markdown::render_markdown;
pub use message::{
    DEFAULT_REVEAL_CHUNK, Message, RevealFrames, Role, looks_like_markdown, render_message,
    render_message_with, render_safe, render_safe_with, reveal_frames,
};
pub use sanitize::{SanitizePolicy, UrlSchemes, sanitize, sanitize_with};
pub use util::{escape_html, plain_text_to_html};
