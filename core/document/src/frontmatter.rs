//! YAML frontmatter for document-wide execution settings.

use serde::Deserialize;

use crate::DocumentError;

/// Document-wide settings parsed from the YAML header.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Frontmatter {
    /// Custom shell executable used for every shell block in the document.
    #[serde(default)]
    pub shell: Option<String>,
}

/// Split Markdown source into its frontmatter and body.
///
/// The header is delimited by `---` lines at the very start of the document.
/// A document without a header parses to the default frontmatter; a header
/// that opens but never closes, or carries invalid YAML, is an error.
pub(crate) fn split(source: &str) -> Result<(Frontmatter, &str), DocumentError> {
    let source = source.trim_start_matches('\u{feff}');
    let Some(rest) = source.strip_prefix("---") else {
        return Ok((Frontmatter::default(), source));
    };
    let Some(rest) = rest.strip_prefix('\n') else {
        // A line like `----` is a thematic break, not a header.
        return Ok((Frontmatter::default(), source));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            let frontmatter = if yaml.trim().is_empty() {
                Frontmatter::default()
            } else {
                serde_yml::from_str(yaml)
                    .map_err(|e| DocumentError::Frontmatter(e.to_string()))?
            };
            return Ok((frontmatter, body));
        }
        offset += line.len();
    }

    Err(DocumentError::Frontmatter(
        "missing closing `---` delimiter".into(),
    ))
}

#[cfg(test)]
#[path = "frontmatter.test.rs"]
mod tests;
