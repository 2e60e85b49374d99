//! Text escaping helpers shared by the rendering paths

/// Escapes HTML special characters.
///
/// Encodes ampersand, angle brackets and both quote characters so the
/// result is safe both as element text and inside a quoted attribute.
///
/// # Arguments
///
/// * `text`: Plain text to escape
///
/// # Returns
///
/// HTML safe string
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders user authored text as inert markup.
///
/// Escapes every special character and turns line feeds into `<br>`.
/// Carriage returns are normalized first so Windows line endings produce a
/// single break. This path never interprets Markdown.
///
/// # Arguments
///
/// * `text`: Text typed by the user
///
/// # Returns
///
/// Markup containing no element other than `<br>`
pub fn plain_text_to_html(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    escape_html(&normalized).replace('\n', "<br>")
}
