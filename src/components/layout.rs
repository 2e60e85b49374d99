//! Page layout wrapper component

use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Where the page stylesheet comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stylesheet<'a> {
    /// CSS text embedded in a `<style>` element.
    Inline(&'a str),
    /// Path or URL of an external stylesheet.
    Link(&'a str),
}

/// Wraps page content with standard HTML structure
///
/// Provides DOCTYPE, charset, viewport and stylesheet loading while the
/// caller provides the page body.
///
/// # Arguments
///
/// * `title`: Page title text
/// * `stylesheet`: Inline CSS or link to the chat stylesheet
/// * `body`: Page-specific body markup
///
/// # Returns
///
/// Complete HTML document with wrapped content
pub fn page_wrapper(title: &str, stylesheet: Stylesheet<'_>, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                @match stylesheet {
                    Stylesheet::Inline(css) => {
                        style { (PreEscaped(css)) }
                    }
                    Stylesheet::Link(href) => {
                        link rel="stylesheet" href=(href);
                    }
                }
            }
            body {
                main class="chat" {
                    (body)
                }
            }
        }
    }
}
