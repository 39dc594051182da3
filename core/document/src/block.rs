//! Code block model and fence-info parsing.

use std::collections::HashMap;

/// One fenced, language-tagged region of source extracted from a document.
///
/// Immutable once parsed. The `name` is unique within its document; when the
/// fence carries no explicit `{name=...}` attribute it is derived from the
/// first word of the first command line.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    language: String,
    name: String,
    lines: Vec<String>,
    content: String,
    interactive: bool,
    attributes: HashMap<String, String>,
}

impl CodeBlock {
    pub(crate) fn new(
        language: String,
        name: String,
        content: String,
        interactive: bool,
        attributes: HashMap<String, String>,
    ) -> Self {
        let lines = content.lines().map(str::to_owned).collect();
        Self {
            language,
            name,
            lines,
            content,
            interactive,
            attributes,
        }
    }

    /// The fence's language tag. Empty when the fence had none.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The block's unique parsed name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The block's source, one entry per line.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The raw block content as written in the fence.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether the block wants the caller's stdin wired through.
    pub fn interactive(&self) -> bool {
        self.interactive
    }

    /// Raw fence attributes (`{key=value ...}`).
    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    /// Replace the block's lines, e.g. after text substitution.
    ///
    /// The raw content is rebuilt from the new lines so `content()` and
    /// `lines()` stay consistent.
    pub fn with_lines(mut self, lines: Vec<String>) -> Self {
        self.content = lines.join("\n");
        self.lines = lines;
        self
    }
}

/// Parsed fence info string: language token plus `{key=value}` attributes.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct FenceInfo {
    pub language: String,
    pub attributes: HashMap<String, String>,
}

/// Parse a fence info string such as `sh {name=deploy interactive=true}`.
///
/// Everything before the first `{` is the language token; attributes are
/// whitespace-separated `key=value` pairs. Malformed pairs are ignored.
pub(crate) fn parse_fence_info(info: &str) -> FenceInfo {
    let (lang_part, attr_part) = match info.split_once('{') {
        Some((lang, rest)) => (lang, rest.trim_end().trim_end_matches('}')),
        None => (info, ""),
    };

    let language = lang_part
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_owned();

    let mut attributes = HashMap::new();
    for pair in attr_part.split_whitespace() {
        if let Some((key, value)) = pair.split_once('=') {
            if !key.is_empty() {
                attributes.insert(key.to_owned(), value.to_owned());
            }
        }
    }

    FenceInfo {
        language,
        attributes,
    }
}

/// Derive a default block name from its content.
///
/// Takes the first word of the first non-comment line, lowercased with
/// anything outside `[a-z0-9-]` squashed to `-`. Falls back to `block`.
pub(crate) fn derive_name(content: &str) -> String {
    let word = content
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with('#'))
        .and_then(|l| l.split_whitespace().next())
        .unwrap_or("block");

    let mut name: String = word
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    name = name.trim_matches('-').to_owned();
    if name.is_empty() {
        name = "block".to_owned();
    }
    name
}

#[cfg(test)]
#[path = "block.test.rs"]
mod tests;
