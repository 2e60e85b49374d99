//! Shared test utilities for integration tests.
//!
//! Provides a small HTML tag scanner used to assert which elements and
//! attributes survive rendering, plus a helper for running the binary.

#![allow(dead_code)]

use anyhow::{Result, bail};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Tags the default sanitizer policy lets through.
pub const ALLOWED_TAGS: &[&str] = &[
    "a", "br", "code", "em", "h1", "h2", "h3", "li", "ol", "p", "pre", "strong", "ul",
];

/// Start tag found in serialized markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    pub name: String,
    pub attributes: Vec<String>,
}

/// Lists start tags in markup produced by the sanitizer.
///
/// Only understands the serialization the sanitizer emits: lowercase names,
/// double quoted attribute values, and text with `<` always escaped.
pub fn start_tags(html: &str) -> Vec<StartTag> {
    let mut tags = Vec::new();
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        rest = &rest[open + 1..];
        if rest.starts_with('/') {
            continue;
        }
        let Some(close) = tag_end(rest) else {
            break;
        };
        let inner = &rest[..close];
        let name_end = inner.find(' ').unwrap_or(inner.len());
        let name = inner[..name_end].to_string();

        let mut attributes = Vec::new();
        let mut attrs = &inner[name_end..];
        while let Some(eq) = attrs.find("=\"") {
            attributes.push(attrs[..eq].trim().to_string());
            let value_start = eq + 2;
            let value_end = attrs[value_start..]
                .find('"')
                .map_or(attrs.len(), |p| value_start + p + 1);
            attrs = &attrs[value_end..];
        }

        tags.push(StartTag { name, attributes });
        rest = &rest[close + 1..];
    }

    tags
}

/// Byte offset of the `>` closing a tag, skipping quoted attribute values.
fn tag_end(tag: &str) -> Option<usize> {
    let mut quoted = false;
    for (i, c) in tag.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '>' if !quoted => return Some(i),
            _ => {}
        }
    }
    None
}

/// Removes every tag, keeping text and entities.
pub fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        match tag_end(&rest[open..]) {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                rest = "";
                break;
            }
        }
    }
    text.push_str(rest);
    text
}

/// Runs the chatmark binary with `stdin` piped in.
///
/// # Errors
///
/// Returns error if the process cannot be spawned or its stdin written
pub fn run_chatmark(args: &[&str], stdin: &str, cwd: &Path) -> Result<Output> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_chatmark"))
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let Some(mut pipe) = child.stdin.take() else {
        bail!("Child stdin was not piped");
    };
    pipe.write_all(stdin.as_bytes())?;
    drop(pipe);

    Ok(child.wait_with_output()?)
}
