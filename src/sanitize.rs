//! Allowlist HTML sanitization.
//!
//! Markup is parsed as a body fragment with html5ever and walked depth
//! first. Allowed elements are kept with their allowed attributes only;
//! any other element is replaced by its text content, so structure is lost
//! but text never is. Comments are removed. The result is freshly
//! serialized and sanitizing it again yields the same string.
//!
//! Flattening can leave nesting the parser would not build itself, such as
//! a heading inside a heading once a foster-parenting `<table>` is gone.
//! The serialization is therefore reparsed and walked again until it no
//! longer changes.

mod policy;
mod walker;

use std::sync::LazyLock;
use tracing::{debug, warn};

pub use policy::{SanitizePolicy, UrlSchemes};

static DEFAULT_POLICY: LazyLock<SanitizePolicy> = LazyLock::new(SanitizePolicy::default);

/// Upper bound on walks over the same input.
const MAX_PASSES: usize = 8;

/// Sanitizes markup with the default chat policy.
///
/// # Arguments
///
/// * `markup`: Untrusted HTML fragment
///
/// # Returns
///
/// Markup containing only allowlisted elements and attributes
pub fn sanitize(markup: &str) -> String {
    sanitize_with(markup, &DEFAULT_POLICY)
}

/// Sanitizes markup with an explicit policy.
///
/// Never fails: the HTML parser repairs any input into a tree.
///
/// # Arguments
///
/// * `markup`: Untrusted HTML fragment
/// * `policy`: Tags, attributes and URL rule to enforce
///
/// # Returns
///
/// Sanitized markup, empty for empty input
pub fn sanitize_with(markup: &str, policy: &SanitizePolicy) -> String {
    if markup.is_empty() {
        return String::new();
    }

    let (mut html, stats) = sanitize_pass(markup, policy);
    let mut passes = 1;
    let mut settled = false;
    while !settled && passes < MAX_PASSES {
        let (next, _) = sanitize_pass(&html, policy);
        passes += 1;
        settled = next == html;
        html = next;
    }

    if !settled {
        warn!(passes, "sanitized markup did not settle");
    }

    debug!(
        kept = stats.kept,
        flattened = stats.flattened,
        comments = stats.comments,
        attributes_dropped = stats.attributes_dropped,
        passes,
        "sanitized markup"
    );

    html
}

fn sanitize_pass(markup: &str, policy: &SanitizePolicy) -> (String, walker::WalkStats) {
    let dom = walker::parse_body_fragment(markup);
    walker::Walker::new(policy).walk_fragment(&dom)
}
