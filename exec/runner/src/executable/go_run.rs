//! Go source blocks run via the toolchain.

use std::io;

use runme_error::RunnerError;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use super::spawn_and_stream;
use crate::config::ExecutableConfig;

/// A block whose content is Go source, compiled and run as one unit.
///
/// The source is written to a scratch directory and handed to `go run`;
/// there is no line-level interaction and no environment side channel.
#[derive(Debug)]
pub struct GoScript {
    pub config: ExecutableConfig,
    pub source: String,
    pub lines: Vec<String>,
}

impl GoScript {
    pub async fn run(&self, cancel: &CancellationToken) -> Result<i32, RunnerError> {
        let scratch = tempfile::Builder::new()
            .prefix("runme-go-")
            .tempdir()
            .map_err(|e| RunnerError::config(format!("failed to create scratch dir: {e}")))?;
        let main = scratch.path().join("main.go");
        std::fs::write(&main, &self.source)
            .map_err(|e| RunnerError::config(format!("failed to write go source: {e}")))?;

        let mut command = Command::new("go");
        command.arg("run").arg(&main);

        let rendered = format!("go run {}", main.display());
        spawn_and_stream(&self.config, command, &rendered, None, cancel).await
    }

    pub async fn dry_run(&self, out: &mut (dyn AsyncWrite + Send + Unpin)) -> io::Result<()> {
        out.write_all(self.source.as_bytes()).await?;
        if !self.source.ends_with('\n') {
            out.write_all(b"\n").await?;
        }
        out.flush().await
    }
}
