//! The `list` subcommand.

use std::path::Path;

use anyhow::Context;
use clap::Args;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Emit machine-readable JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

pub fn list(filename: &Path, args: &ListArgs) -> anyhow::Result<()> {
    let doc = runme_document::load(filename)
        .with_context(|| format!("failed to load {}", filename.display()))?;

    if args.json {
        let blocks: Vec<serde_json::Value> = doc
            .blocks
            .iter()
            .map(|b| {
                serde_json::json!({
                    "name": b.name(),
                    "language": b.language(),
                    "interactive": b.interactive(),
                    "first_command": b.lines().first(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&blocks)?);
        return Ok(());
    }

    for block in &doc.blocks {
        let first = block.lines().first().map(String::as_str).unwrap_or("");
        println!("{}\t{}\t{}", block.name(), block.language(), first);
    }
    Ok(())
}
