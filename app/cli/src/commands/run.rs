//! The `run` subcommand: resolve a block, run or dry-run it.

use std::path::Path;

use anyhow::Context;
use clap::Args;
use runme_document::FileCodeBlock;
use runme_error::RunnerError;
use runme_runner::LocalRunner;
use runme_runner::Project;
use runme_runner::Runner;
use runme_runner::SignalScope;
use runme_runner::StdinSource;
use runme_runner::shell_socket;

use crate::replace;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Name of the block to run.
    pub name: String,

    /// Print the final command without executing.
    #[arg(long)]
    pub dry_run: bool,

    /// Rewrite block lines with a sed-style script before running.
    #[arg(short = 'r', long = "replace")]
    pub replace: Vec<String>,

    /// Per-run environment override (NAME=VALUE), highest precedence.
    #[arg(long = "env")]
    pub env: Vec<String>,
}

pub async fn run(filename: &Path, args: &RunArgs) -> anyhow::Result<()> {
    let doc = runme_document::load(filename)
        .with_context(|| format!("failed to load {}", filename.display()))?;
    let block = doc.lookup(&args.name)?.clone();

    // Substitutions apply before construction; a bad script aborts here,
    // before anything can execute.
    let lines = replace::apply(&args.replace, block.lines().to_vec())?;
    let block = block.with_lines(lines);

    let file_block =
        FileCodeBlock::new(block, doc.frontmatter.clone()).with_file(filename.to_path_buf());

    let cwd = std::env::current_dir()?;
    let mut runner = LocalRunner::new()
        .with_stdin(StdinSource::inherited())
        .with_project(Project::new(&cwd))
        .with_shell_id(shell_socket::shell_id_from_env());

    for entry in &args.env {
        let (name, value) = entry
            .split_once('=')
            .with_context(|| format!("invalid --env entry {entry:?}, expected NAME=VALUE"))?;
        runner = runner.with_env_override(name, value);
    }

    if args.dry_run {
        let mut out = tokio::io::stderr();
        runner.dry_run_block(&file_block, &mut out).await?;
        return Ok(());
    }

    let signals = SignalScope::install()?;
    let result = runner.run_block(&file_block, &signals.token()).await;
    runner.cleanup().await?;

    match result {
        Ok(()) => Ok(()),
        // Forward the block's own exit status to our caller.
        Err(RunnerError::Execution { name, code }) => {
            tracing::warn!(name, code, "block exited non-zero");
            std::process::exit(code);
        }
        Err(err) => Err(err.into()),
    }
}
