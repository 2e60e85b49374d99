//! Placeholder table shielding finished markup from later rewrite stages.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Opens a slot token. Private use code point, never emitted by a stage.
const OPEN: char = '\u{E000}';

/// Closes a slot token.
const CLOSE: char = '\u{E001}';

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{E000}([0-9]+)\u{E001}").expect("slot token pattern is valid"));

/// Side table of rendered fragments referenced from the working text.
///
/// A stage that produces markup which must survive the remaining stages
/// verbatim stores it here and leaves a short token in the text. Tokens
/// contain no Markdown syntax, so emphasis, list and paragraph rules pass
/// over them untouched. [`SlotTable::restore`] swaps every token back once
/// the text is fully assembled.
#[derive(Debug, Default)]
pub struct SlotTable {
    fragments: Vec<String>,
}

impl SlotTable {
    /// Stores rendered markup and returns the token standing in for it.
    pub fn shield(&mut self, html: String) -> String {
        let index = self.fragments.len();
        self.fragments.push(html);
        format!("{OPEN}{index}{CLOSE}")
    }

    /// Returns the markup the text starts with, looking through a leading token.
    ///
    /// Paragraph assembly decides whether a block is already block level
    /// by its first tag, which may be hidden behind a token.
    pub fn leading_html<'a>(&'a self, text: &'a str) -> &'a str {
        match TOKEN.captures(text) {
            Some(caps) if caps.get(0).is_some_and(|m| m.start() == 0) => caps
                .get(1)
                .and_then(|index| index.as_str().parse::<usize>().ok())
                .and_then(|index| self.fragments.get(index))
                .map_or(text, |fragment| self.leading_html(fragment)),
            _ => text,
        }
    }

    /// Replaces every token in `text` with its stored markup.
    ///
    /// Fragments may themselves contain tokens of earlier slots (a link
    /// label holding inline code), so restoration recurses, but only into
    /// strictly lower indices.
    pub fn restore(&self, text: &str) -> String {
        self.restore_below(text, self.fragments.len())
    }

    fn restore_below(&self, text: &str, limit: usize) -> String {
        TOKEN
            .replace_all(text, |caps: &Captures| {
                let Some(index) = caps[1].parse::<usize>().ok().filter(|i| *i < limit) else {
                    return String::new();
                };
                self.restore_below(&self.fragments[index], index)
            })
            .into_owned()
    }

    /// Number of shielded fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }
}

/// Removes token delimiters from untrusted input so it cannot forge slots.
pub fn strip_sentinels(text: &str) -> String {
    text.chars().filter(|c| *c != OPEN && *c != CLOSE).collect()
}
