//! Execution runner for Markdown code blocks.
//!
//! Turns parsed code blocks into running child processes while a
//! [`Session`] carries shell state (environment variables, working
//! directory) across sequential runs. The [`Runner`] contract is satisfied
//! locally by [`LocalRunner`]; a remote variant proxying to an execution
//! service satisfies the same contract so callers never care where a block
//! runs.
//!
//! ```no_run
//! use runme_document::{Document, FileCodeBlock};
//! use runme_runner::{LocalRunner, Runner, SignalScope};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = Document::parse("```sh\necho hello\n```")?;
//! let block = FileCodeBlock::new(doc.lookup("echo")?.clone(), doc.frontmatter.clone());
//!
//! let runner = LocalRunner::new();
//! let signals = SignalScope::install()?;
//! runner.run_block(&block, &signals.token()).await?;
//! # Ok(())
//! # }
//! ```

pub mod cancel;
pub mod config;
pub mod env;
pub mod executable;
pub mod io;
pub mod local;
pub mod project;
pub mod runner;
pub mod session;
pub mod shell_socket;

pub use cancel::SignalScope;
pub use config::EXIT_PENDING;
pub use config::ExecutableConfig;
pub use config::ExitCell;
pub use env::EnvSnapshot;
pub use executable::Executable;
pub use io::OutputSink;
pub use io::SharedBuffer;
pub use io::StdinSource;
pub use local::LocalRunner;
pub use project::Project;
pub use runner::Runner;
pub use runner::SessionStrategy;
pub use session::Session;
