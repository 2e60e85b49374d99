//! Chat transcript components

use maud::{Markup, PreEscaped, html};

use super::layout::{Stylesheet, page_wrapper};
use crate::message::{Message, Role, render_message_with};
use crate::sanitize::SanitizePolicy;

/// Renders one chat row: avatar plus bubble.
///
/// User rows put the bubble before the avatar so they align right; assistant
/// rows start with the avatar. The bubble content is the role specific
/// rendering from [`render_message_with`], which is already safe markup.
pub fn message_row(message: &Message, policy: &SanitizePolicy) -> Markup {
    let role = message.role();
    let content = render_message_with(message, policy);

    let avatar = html! {
        div class="avatar" { (role.avatar_label()) }
    };
    let bubble = html! {
        div class="bubble" {
            div class="content" { (PreEscaped(content)) }
        }
    };

    html! {
        div class={ "message " (role.as_str()) } {
            @if role == Role::User {
                (bubble)
                (avatar)
            } @else {
                (avatar)
                (bubble)
            }
        }
    }
}

/// Renders a full transcript page.
///
/// # Arguments
///
/// * `title`: Page title
/// * `messages`: Conversation turns in display order
/// * `policy`: Sanitizer policy for assistant replies
/// * `stylesheet`: Inline CSS or link to it
///
/// # Returns
///
/// Complete HTML document
pub fn transcript_page(
    title: &str,
    messages: &[Message],
    policy: &SanitizePolicy,
    stylesheet: Stylesheet<'_>,
) -> Markup {
    let body = html! {
        div class="messages" {
            @for message in messages {
                (message_row(message, policy))
            }
        }
    };
    page_wrapper(title, stylesheet, body)
}
