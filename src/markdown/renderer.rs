//! Staged rewrite of the chat Markdown subset into HTML.

use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::debug;

use super::slots::{SlotTable, strip_sentinels};
use crate::util::escape_html;

static FENCED_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```([A-Za-z0-9_-]+)?\n(.*?)```").expect("fenced code pattern is valid")
});

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(#{1,3})[ \t]+(.+)$").expect("heading pattern is valid")
});

static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("inline code pattern is valid"));

static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]\n]+)\]\(([^()\s\x{E000}\x{E001}]+)\)").expect("link pattern is valid")
});

static STRONG_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*\n]+)\*\*").expect("strong pattern is valid"));

static STRONG_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__([^_\n]+)__").expect("strong pattern is valid"));

static EM_STAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*([^*\s](?:[^*\n]*[^*\s])?)\*").expect("emphasis pattern is valid")
});

static EM_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"_([^_\s](?:[^_\n]*[^_\s])?)_").expect("emphasis pattern is valid")
});

static BULLET_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\n)([-*] .*(?:\n[-*] .*)+)").expect("bullet list pattern is valid")
});

static NUMBERED_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\n)([0-9]+\. .*(?:\n[0-9]+\. .*)+)").expect("numbered list pattern is valid")
});

static BULLET_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*]\s+").expect("bullet marker pattern is valid"));

static NUMBER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.\s+").expect("number marker pattern is valid"));

static BLOCK_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("block separator pattern is valid"));

static BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^<(h\d|ul|ol|li|pre|blockquote|p|table|code)").expect("block tag pattern is valid")
});

/// Renders the chat Markdown subset to HTML.
///
/// Runs a fixed sequence of rewrite stages over the whole text:
///
/// 1. newline normalization
/// 2. fenced code blocks
/// 3. headings (`#`, `##`, `###`)
/// 4. inline code spans
/// 5. links
/// 6. strong, then emphasis
/// 7. bullet and numbered lists
/// 8. paragraphs
///
/// Code spans and links are recognized before emphasis, not after it, so
/// `*` and `_` inside code or a URL stay literal. Code blocks, code spans
/// and links are rendered into a [`SlotTable`] as soon as they are
/// recognized, so no later stage can rewrite their payload. A link URL
/// never contains a shielded construct; `[b](`c`)` stays text.
/// Prose outside those constructs is NOT escaped; raw HTML in the input is
/// passed through for the sanitizer to deal with.
///
/// Never fails. Empty input yields an empty string and unterminated
/// constructs fall through to plain paragraphs.
///
/// # Arguments
///
/// * `raw`: Untrusted Markdown text
///
/// # Returns
///
/// HTML fragment that still needs sanitizing before display
pub fn render_markdown(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let mut slots = SlotTable::default();

    let text = normalize_newlines(raw);
    let text = fenced_code_blocks(&text, &mut slots);
    let text = headings(&text);
    let text = inline_code(&text, &mut slots);
    let text = links(&text, &mut slots);
    let text = emphasis(&text);
    let text = lists(&text);
    let html = paragraphs(&text, &slots);
    let html = slots.restore(&html);

    debug!(
        input_len = raw.len(),
        output_len = html.len(),
        shielded = slots.len(),
        "rendered markdown"
    );

    html
}

fn normalize_newlines(text: &str) -> String {
    strip_sentinels(&text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Code fences become `<pre><code>` blocks set apart by blank lines.
fn fenced_code_blocks(text: &str, slots: &mut SlotTable) -> String {
    FENCED_CODE
        .replace_all(text, |caps: &Captures| {
            let class = caps
                .get(1)
                .map(|lang| format!(" class=\"lang-{}\"", escape_html(lang.as_str())))
                .unwrap_or_default();
            let body = escape_html(&caps[2]);
            let token = slots.shield(format!("<pre><code{class}>{body}</code></pre>"));
            format!("\n\n{token}\n\n")
        })
        .into_owned()
}

fn headings(text: &str) -> String {
    HEADING
        .replace_all(text, |caps: &Captures| {
            let level = caps[1].len();
            format!("<h{level}>{}</h{level}>", caps[2].trim_end())
        })
        .into_owned()
}

fn inline_code(text: &str, slots: &mut SlotTable) -> String {
    INLINE_CODE
        .replace_all(text, |caps: &Captures| {
            slots.shield(format!("<code>{}</code>", escape_html(&caps[1])))
        })
        .into_owned()
}

/// Links open in a new tab. Label and URL are escaped; the URL scheme is
/// left for the sanitizer policy to judge.
fn links(text: &str, slots: &mut SlotTable) -> String {
    LINK.replace_all(text, |caps: &Captures| {
        let label = escape_html(&caps[1]);
        let url = escape_html(&caps[2]);
        slots.shield(format!(
            "<a href=\"{url}\" target=\"_blank\" rel=\"noopener noreferrer\">{label}</a>"
        ))
    })
    .into_owned()
}

/// Strong must run before emphasis, otherwise `**x**` would be read as two
/// adjacent single-star spans.
fn emphasis(text: &str) -> String {
    let text = STRONG_STAR.replace_all(text, "<strong>$1</strong>");
    let text = STRONG_UNDERSCORE.replace_all(&text, "<strong>$1</strong>");
    let text = EM_STAR.replace_all(&text, "<em>$1</em>");
    EM_UNDERSCORE.replace_all(&text, "<em>$1</em>").into_owned()
}

fn lists(text: &str) -> String {
    let text = group_list(text, &BULLET_RUN, &BULLET_MARKER, "ul");
    group_list(&text, &NUMBERED_RUN, &NUMBER_MARKER, "ol")
}

/// Collapses each run of two or more marker lines into one list element.
///
/// A lone marker line is not a list and stays in the prose.
fn group_list(text: &str, run: &Regex, marker: &Regex, tag: &str) -> String {
    run.replace_all(text, |caps: &Captures| {
        let items: String = caps[1]
            .lines()
            .map(|line| format!("<li>{}</li>", marker.replace(line, "").trim()))
            .collect();
        format!("\n\n<{tag}>{items}</{tag}>\n\n")
    })
    .into_owned()
}

/// Wraps loose text blocks in `<p>`, leaving block level markup alone.
fn paragraphs(text: &str, slots: &SlotTable) -> String {
    BLOCK_SEPARATOR
        .split(text)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| {
            if BLOCK_TAG.is_match(slots.leading_html(block)) {
                block.to_string()
            } else {
                format!("<p>{}</p>", block.replace('\n', "<br>"))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
