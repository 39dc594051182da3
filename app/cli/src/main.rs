//! `runme`: run code blocks from Markdown documents.

mod commands;
mod replace;

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "runme", version, about = "Run code blocks from Markdown documents")]
struct Cli {
    /// Markdown file to load blocks from.
    #[arg(long, global = true, default_value = "README.md")]
    filename: PathBuf,

    /// Switch to this directory before loading and running.
    #[arg(long, global = true)]
    chdir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a selected command identified by its unique parsed name.
    #[command(alias = "exec")]
    Run(commands::run::RunArgs),
    /// List the runnable blocks found in the document.
    List(commands::list::ListArgs),
    /// Start a background shell that accepts forwarded commands.
    Shell,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Some(dir) = &cli.chdir {
        std::env::set_current_dir(dir)?;
    }

    match &cli.command {
        Commands::Run(args) => commands::run::run(&cli.filename, args).await,
        Commands::List(args) => commands::list::list(&cli.filename, args),
        Commands::Shell => commands::shell_host::shell().await,
    }
}
