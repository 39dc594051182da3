//! The runner contract shared by local and remote variants.

use async_trait::async_trait;
use runme_document::FileCodeBlock;
use runme_error::RunnerError;
use tokio::io::AsyncWrite;
use tokio_util::sync::CancellationToken;

/// How a runner binds to its session.
///
/// Only meaningful for variants that manage sessions out of process; the
/// local runner always owns exactly one session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionStrategy {
    /// Reuse the runner's existing session.
    #[default]
    Reuse,
    /// Create a fresh session for the connection.
    New,
    /// One throwaway session per block.
    Isolated,
}

/// Orchestrates turning code blocks into running executables.
///
/// Both the local variant and any remote variant satisfy this contract, so
/// callers stay agnostic to where a block actually executes.
#[async_trait]
pub trait Runner: Send + Sync {
    /// Build and execute the block under `cancel`.
    ///
    /// Construction failures (unsupported language, bad configuration) are
    /// terminal for this single call and never corrupt the session. A
    /// non-zero exit is reported as [`RunnerError::Execution`], not a panic.
    async fn run_block(
        &self,
        block: &FileCodeBlock,
        cancel: &CancellationToken,
    ) -> Result<(), RunnerError>;

    /// Render what would run to `out` without creating a process or
    /// mutating the session.
    async fn dry_run_block(
        &self,
        block: &FileCodeBlock,
        out: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<(), RunnerError>;

    /// Release runner-held resources. Bookkeeping for the local variant;
    /// a remote variant tears down its connection here.
    async fn cleanup(&self) -> Result<(), RunnerError>;

    /// An independent runner sharing this one's session and I/O targets
    /// but with its own execution state.
    fn clone_runner(&self) -> Box<dyn Runner>;
}
