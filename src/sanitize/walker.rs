//! Fragment parsing and the allow-or-flatten tree walk.

use html5ever::tendril::TendrilSink;
use html5ever::{LocalName, Namespace, ParseOpts, QualName, parse_fragment};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::policy::SanitizePolicy;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Elements serialized without an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Counters reported once a walk completes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkStats {
    pub kept: usize,
    pub flattened: usize,
    pub comments: usize,
    pub attributes_dropped: usize,
}

/// Parses markup the way a browser parses `innerHTML` on a `<body>`.
///
/// The parser accepts any input, so this never fails; malformed markup is
/// repaired into some tree.
pub fn parse_body_fragment(markup: &str) -> RcDom {
    let context = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from("body"));
    parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new()).one(markup)
}

/// Walks a parsed fragment and writes the sanitized serialization.
///
/// The parsed tree is only read. Output is assembled in a fresh string,
/// so replacing an element by its text never disturbs the traversal.
pub struct Walker<'a> {
    policy: &'a SanitizePolicy,
    output: String,
    stats: WalkStats,
}

impl<'a> Walker<'a> {
    pub fn new(policy: &'a SanitizePolicy) -> Self {
        Self {
            policy,
            output: String::new(),
            stats: WalkStats::default(),
        }
    }

    /// Serializes the children of the fragment root.
    ///
    /// html5ever places fragment content under a synthetic `<html>` element
    /// beneath the document node.
    pub fn walk_fragment(mut self, dom: &RcDom) -> (String, WalkStats) {
        let roots: Vec<Handle> = dom.document.children.borrow().clone();
        for root in &roots {
            self.walk_children(root);
        }
        (self.output, self.stats)
    }

    fn walk_children(&mut self, node: &Handle) {
        let children: Vec<Handle> = node.children.borrow().clone();
        for child in &children {
            self.walk_node(child);
        }
    }

    fn walk_node(&mut self, node: &Handle) {
        match &node.data {
            NodeData::Text { contents } => push_text(&mut self.output, &contents.borrow()),
            NodeData::Element { name, attrs, .. } => {
                let tag: &str = &name.local;
                if &*name.ns == HTML_NAMESPACE && self.policy.is_tag_allowed(tag) {
                    self.stats.kept += 1;
                    self.open_tag(tag, &attrs.borrow());
                    if VOID_ELEMENTS.contains(&tag) {
                        return;
                    }
                    let content_start = self.output.len();
                    self.walk_children(node);
                    // The parser drops one newline right after <pre>; put it back
                    // so the output reparses to the same text.
                    if tag == "pre" && self.output[content_start..].starts_with('\n') {
                        self.output.insert(content_start, '\n');
                    }
                    self.output.push_str("</");
                    self.output.push_str(tag);
                    self.output.push('>');
                } else {
                    self.stats.flattened += 1;
                    let mut text = String::new();
                    collect_text(node, &mut text);
                    push_text(&mut self.output, &text);
                }
            }
            NodeData::Comment { .. } => self.stats.comments += 1,
            NodeData::Document
            | NodeData::Doctype { .. }
            | NodeData::ProcessingInstruction { .. } => {}
        }
    }

    fn open_tag(&mut self, tag: &str, attrs: &[html5ever::Attribute]) {
        self.output.push('<');
        self.output.push_str(tag);

        let mut seen: Vec<String> = Vec::new();
        for attr in attrs {
            let attr_name = (*attr.name.local).to_ascii_lowercase();
            let keep = attr.name.ns.is_empty()
                && !seen.contains(&attr_name)
                && self.policy.is_attribute_allowed(tag, &attr_name)
                && (attr_name != "href" || self.policy.is_url_allowed(&attr.value));
            if !keep {
                self.stats.attributes_dropped += 1;
                continue;
            }

            self.output.push(' ');
            self.output.push_str(&attr_name);
            self.output.push_str("=\"");
            push_attribute_value(&mut self.output, &attr.value);
            self.output.push('"');
            seen.push(attr_name);
        }

        self.output.push('>');
    }
}

/// Appends the text content of a node: every descendant text node in
/// document order. Comments contribute nothing.
fn collect_text(node: &Handle, out: &mut String) {
    for child in node.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { .. } => collect_text(child, out),
            _ => {}
        }
    }
}

fn push_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{A0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

fn push_attribute_value(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{A0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}
