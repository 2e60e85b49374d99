//! Allowlist policy consulted by the sanitizer walk.

use std::collections::{BTreeMap, BTreeSet};

/// Rule applied to `href` values of anchors that survive the tag allowlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlSchemes {
    /// Every value is kept, including `javascript:` URLs.
    Any,
    /// Absolute URLs must use one of these lowercase schemes. Relative and
    /// fragment URLs are always kept.
    Only(BTreeSet<String>),
}

impl UrlSchemes {
    /// `http`, `https` and `mailto`.
    pub fn web() -> Self {
        Self::Only(
            ["http", "https", "mailto"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    }

    /// Checks whether a URL passes this rule.
    pub fn allows(&self, url: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Only(schemes) => url_scheme(url).is_none_or(|scheme| schemes.contains(&scheme)),
        }
    }
}

impl Default for UrlSchemes {
    fn default() -> Self {
        Self::web()
    }
}

/// Extracts the lowercase scheme of an absolute URL.
///
/// Mirrors how browsers read the value: tab and newline characters are
/// ignored anywhere and leading control characters or spaces are skipped.
/// Returns `None` for relative URLs, including those whose first colon
/// comes after a path, query or fragment delimiter.
fn url_scheme(url: &str) -> Option<String> {
    let cleaned: String = url
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect();
    let trimmed = cleaned.trim_start_matches(|c: char| c <= ' ');
    let (candidate, _) = trimmed.split_once(':')?;

    let mut chars = candidate.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let valid = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    (starts_alpha && valid).then(|| candidate.to_ascii_lowercase())
}

/// Tags and per tag attributes the sanitizer keeps.
///
/// The default policy is the chat allowlist:
///
/// | tag | attributes |
/// |-----|------------|
/// | `a` | `href`, `target`, `rel` |
/// | `code`, `pre` | `class` |
/// | `p`, `br`, `strong`, `em`, `h1`, `h2`, `h3`, `ul`, `ol`, `li` | none |
///
/// Anchor `href` values must use `http`, `https` or `mailto` (or be
/// relative); use [`UrlSchemes::Any`] to keep every value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizePolicy {
    tags: BTreeMap<String, BTreeSet<String>>,
    url_schemes: UrlSchemes,
}

impl SanitizePolicy {
    /// Creates a policy that allows no tags at all.
    ///
    /// Everything sanitized with it is flattened to escaped text.
    pub fn new() -> Self {
        Self {
            tags: BTreeMap::new(),
            url_schemes: UrlSchemes::default(),
        }
    }

    /// Allows a tag without attributes.
    pub fn allow_tag(mut self, tag: &str) -> Self {
        self.tags.entry(tag.to_ascii_lowercase()).or_default();
        self
    }

    /// Allows an attribute on a tag, allowing the tag as well.
    pub fn allow_attribute(mut self, tag: &str, attribute: &str) -> Self {
        self.tags
            .entry(tag.to_ascii_lowercase())
            .or_default()
            .insert(attribute.to_ascii_lowercase());
        self
    }

    /// Replaces the anchor URL rule.
    pub fn url_schemes(mut self, url_schemes: UrlSchemes) -> Self {
        self.url_schemes = url_schemes;
        self
    }

    /// Checks whether elements with this tag name survive.
    pub fn is_tag_allowed(&self, tag: &str) -> bool {
        self.tags.contains_key(&tag.to_ascii_lowercase())
    }

    /// Checks whether an attribute survives on an element with this tag.
    pub fn is_attribute_allowed(&self, tag: &str, attribute: &str) -> bool {
        self.tags
            .get(&tag.to_ascii_lowercase())
            .is_some_and(|attributes| attributes.contains(&attribute.to_ascii_lowercase()))
    }

    /// Checks an anchor `href` value against the URL rule.
    pub fn is_url_allowed(&self, url: &str) -> bool {
        self.url_schemes.allows(url)
    }

    /// Allowed tag names in sorted order.
    pub fn allowed_tags(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }
}

impl Default for SanitizePolicy {
    fn default() -> Self {
        ["p", "br", "strong", "em", "h1", "h2", "h3", "ul", "ol", "li"]
            .into_iter()
            .fold(Self::new(), Self::allow_tag)
            .allow_attribute("a", "href")
            .allow_attribute("a", "target")
            .allow_attribute("a", "rel")
            .allow_attribute("code", "class")
            .allow_attribute("pre", "class")
    }
}
