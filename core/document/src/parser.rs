//! Fenced code block extraction.

use std::collections::HashMap;

use pulldown_cmark::CodeBlockKind;
use pulldown_cmark::Event;
use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::Tag;
use pulldown_cmark::TagEnd;

use crate::block;
use crate::block::CodeBlock;

/// Extract the ordered sequence of fenced code blocks from a Markdown body.
///
/// Indented code blocks are ignored: only fenced blocks can carry a language
/// tag and attributes. Names are unique within the document; collisions get
/// a numeric suffix in source order.
pub(crate) fn extract_blocks(body: &str) -> Vec<CodeBlock> {
    let parser = Parser::new_ext(body, Options::empty());

    let mut blocks = Vec::new();
    let mut current: Option<(String, String)> = None;

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                current = Some((info.to_string(), String::new()));
            }
            Event::Text(text) => {
                if let Some((_, content)) = current.as_mut() {
                    content.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((info, content)) = current.take() {
                    blocks.push((info, content));
                }
            }
            _ => {}
        }
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    blocks
        .into_iter()
        .map(|(info, content)| {
            let parsed = block::parse_fence_info(&info);
            let content = content.trim_end_matches('\n').to_owned();

            let base = parsed
                .attributes
                .get("name")
                .cloned()
                .unwrap_or_else(|| block::derive_name(&content));
            let name = match seen.get(&base).copied() {
                None => {
                    seen.insert(base.clone(), 1);
                    base
                }
                Some(n) => {
                    seen.insert(base.clone(), n + 1);
                    format!("{base}-{}", n + 1)
                }
            };

            let interactive = parsed
                .attributes
                .get("interactive")
                .is_some_and(|v| v == "true");

            CodeBlock::new(
                parsed.language,
                name,
                content,
                interactive,
                parsed.attributes,
            )
        })
        .collect()
}

#[cfg(test)]
#[path = "parser.test.rs"]
mod tests;
