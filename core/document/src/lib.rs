//! Markdown document model for executable code blocks.
//!
//! A [`Document`] is parsed from Markdown source and yields the ordered
//! sequence of fenced, language-tagged [`CodeBlock`]s found in it, plus the
//! optional YAML frontmatter. Blocks are immutable once parsed; the runner
//! consumes them read-only.

mod block;
mod frontmatter;
mod parser;

use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

pub use block::CodeBlock;
pub use frontmatter::Frontmatter;

/// Errors produced while loading or parsing a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid frontmatter: {0}")]
    Frontmatter(String),
    #[error("no code block named {name:?}")]
    UnknownBlock { name: String },
}

/// A parsed Markdown document: frontmatter plus its executable blocks.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub frontmatter: Frontmatter,
    pub blocks: Vec<CodeBlock>,
}

impl Document {
    /// Parse Markdown source into a document.
    ///
    /// Frontmatter is optional; a malformed frontmatter header is an error,
    /// a missing one is not.
    pub fn parse(source: &str) -> Result<Self, DocumentError> {
        let (frontmatter, body) = frontmatter::split(source)?;
        let blocks = parser::extract_blocks(body);
        Ok(Self {
            frontmatter,
            blocks,
        })
    }

    /// Look up a block by its unique parsed name.
    pub fn lookup(&self, name: &str) -> Result<&CodeBlock, DocumentError> {
        self.blocks
            .iter()
            .find(|b| b.name() == name)
            .ok_or_else(|| DocumentError::UnknownBlock { name: name.into() })
    }
}

/// A code block paired with the document it came from.
///
/// This is the unit the runner consumes: the block itself, the originating
/// file (used to resolve the working directory), and the document-wide
/// frontmatter (which may carry a shell override).
#[derive(Debug, Clone)]
pub struct FileCodeBlock {
    pub block: CodeBlock,
    pub file: Option<PathBuf>,
    pub frontmatter: Frontmatter,
}

impl FileCodeBlock {
    pub fn new(block: CodeBlock, frontmatter: Frontmatter) -> Self {
        Self {
            block,
            file: None,
            frontmatter,
        }
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// Load and parse a document from disk.
pub fn load(path: &Path) -> Result<Document, DocumentError> {
    let source = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Document::parse(&source)
}
