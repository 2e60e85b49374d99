//! Chat messages and their per author rendering paths.

use clap::ValueEnum;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::sanitize::{SanitizePolicy, sanitize_with};
use crate::util::plain_text_to_html;
use crate::{markdown, sanitize};

/// Characters revealed per typewriter frame unless told otherwise.
pub const DEFAULT_REVEAL_CHUNK: usize = 3;

static MARKDOWN_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```|\*\*|\[[^\]]+\]\([^)]+\)|\A#|<\w+").expect("markdown hint pattern is valid")
});

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Lowercase name, also used as the CSS class of the message row.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Single letter shown in the avatar circle.
    pub fn avatar_label(&self) -> &'static str {
        match self {
            Role::User => "U",
            Role::Assistant => "A",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Renders raw Markdown and sanitizes the result with the default policy.
pub fn render_safe(raw: &str) -> String {
    sanitize::sanitize(&markdown::render_markdown(raw))
}

/// Renders raw Markdown and sanitizes the result with `policy`.
pub fn render_safe_with(raw: &str, policy: &SanitizePolicy) -> String {
    sanitize_with(&markdown::render_markdown(raw), policy)
}

/// Renders a message body for display with the default policy.
///
/// Assistant replies go through the Markdown pipeline. User text is only
/// escaped with line breaks preserved; it never reaches the Markdown
/// transformer.
pub fn render_message(message: &Message) -> String {
    match message.role {
        Role::Assistant => render_safe(&message.content),
        Role::User => plain_text_to_html(&message.content),
    }
}

/// Renders a message body for display with an explicit sanitizer policy.
pub fn render_message_with(message: &Message, policy: &SanitizePolicy) -> String {
    match message.role {
        Role::Assistant => render_safe_with(&message.content, policy),
        Role::User => plain_text_to_html(&message.content),
    }
}

/// Guesses whether a reply uses Markdown worth rendering.
///
/// Looks for a code fence, `**`, a `[label](url)` link, a `#` as the very
/// first character, or something shaped like an HTML tag. Replies without
/// any of these can be revealed as plain text with [`reveal_frames`].
pub fn looks_like_markdown(text: &str) -> bool {
    MARKDOWN_HINT.is_match(text)
}

/// Typewriter frames for a plain text reply.
///
/// Yields the escaped, line broken markup of a growing prefix of `text`,
/// `chunk` characters longer each time. Prefixes are cut on characters of
/// the source text, so a frame never ends inside an entity. The final frame
/// equals [`plain_text_to_html`] of the whole text; empty text yields no
/// frames. A `chunk` of zero is treated as one.
pub fn reveal_frames(text: &str, chunk: usize) -> RevealFrames {
    RevealFrames {
        text: text.replace("\r\n", "\n").replace('\r', "\n"),
        end: 0,
        chunk: chunk.max(1),
    }
}

/// Iterator returned by [`reveal_frames`].
#[derive(Debug, Clone)]
pub struct RevealFrames {
    text: String,
    end: usize,
    chunk: usize,
}

impl Iterator for RevealFrames {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.end >= self.text.len() {
            return None;
        }

        self.end = self.text[self.end..]
            .char_indices()
            .nth(self.chunk)
            .map_or(self.text.len(), |(offset, _)| self.end + offset);

        Some(plain_text_to_html(&self.text[..self.end]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names() {
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
        assert_eq!(Role::User.avatar_label(), "U");
        assert_eq!(Role::Assistant.avatar_label(), "A");
    }

    #[test]
    fn test_message_accessors() {
        // Arrange & Act
        let message = Message::user("hi");

        // Assert
        assert_eq!(message.role(), Role::User);
        assert_eq!(message.content(), "hi");
        assert_eq!(Message::assistant("x").role(), Role::Assistant);
    }

    #[test]
    fn test_render_safe_composes_pipeline() {
        // Arrange
        let raw = "**hi** <span onclick=\"x\">there</span>";

        // Act
        let html = render_safe(raw);

        // Assert
        assert_eq!(html, "<p><strong>hi</strong> there</p>");
    }

    #[test]
    fn test_render_safe_with_permissive_links() {
        // Arrange
        let policy = SanitizePolicy::default().url_schemes(crate::sanitize::UrlSchemes::Any);

        // Act
        let html = render_safe_with("[x](javascript:void)", &policy);

        // Assert
        assert!(html.contains("href=\"javascript:void\""), "{}", html);
    }

    #[test]
    fn test_assistant_message_renders_markdown() {
        // Arrange
        let message = Message::assistant("- a\n- b");

        // Act
        let html = render_message(&message);

        // Assert
        assert_eq!(html, "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn test_user_message_is_escaped() {
        // Arrange
        let message = Message::user("**no** <b>markup</b>\nsecond");

        // Act
        let html = render_message(&message);

        // Assert
        assert_eq!(html, "**no** &lt;b&gt;markup&lt;/b&gt;<br>second");
    }

    #[test]
    fn test_looks_like_markdown() {
        assert!(looks_like_markdown("```\ncode\n```"));
        assert!(looks_like_markdown("some **bold**"));
        assert!(looks_like_markdown("see [docs](https://x)"));
        assert!(looks_like_markdown("# Title"));
        assert!(looks_like_markdown("a <b>tag"));
        assert!(!looks_like_markdown("plain answer, 3 < 4"));
        assert!(!looks_like_markdown("not a # heading"));
        assert!(!looks_like_markdown(""));
    }

    #[test]
    fn test_reveal_frames_grow_by_chunk() {
        // Arrange & Act
        let frames: Vec<String> = reveal_frames("abcdefg", 3).collect();

        // Assert
        assert_eq!(frames, vec!["abc", "abcdef", "abcdefg"]);
    }

    #[test]
    fn test_reveal_frames_never_split_entities() {
        // Arrange & Act
        let frames: Vec<String> = reveal_frames("a<b\nc", 2).collect();

        // Assert
        assert_eq!(frames, vec!["a&lt;", "a&lt;b<br>", "a&lt;b<br>c"]);
    }

    #[test]
    fn test_reveal_frames_multibyte() {
        let frames: Vec<String> = reveal_frames("héllo wörld", 4).collect();

        assert_eq!(frames, vec!["héll", "héllo wö", "héllo wörld"]);
    }

    #[test]
    fn test_reveal_frames_last_is_full_text() {
        // Arrange
        let text = "line\r\nnext & last";

        // Act
        let last = reveal_frames(text, DEFAULT_REVEAL_CHUNK).last();

        // Assert
        assert_eq!(last, Some(plain_text_to_html(text)));
    }

    #[test]
    fn test_reveal_frames_empty_and_zero_chunk() {
        assert_eq!(reveal_frames("", 3).count(), 0);
        assert_eq!(reveal_frames("abc", 0).count(), 3);
    }
}
