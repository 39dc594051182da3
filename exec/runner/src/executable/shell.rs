//! Shell-based executables.

use std::io;
use std::path::Path;

use runme_error::RunnerError;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use super::env_dump_trap;
use super::spawn_and_stream;
use crate::config::ExecutableConfig;
use crate::env::EnvSnapshot;

#[cfg(unix)]
const DEFAULT_SHELL: &str = "/bin/sh";
#[cfg(not(unix))]
const DEFAULT_SHELL: &str = "cmd.exe";

/// A block executed by a shell interpreter.
///
/// In interactive (TTY) mode the shell is spawned bare and the block's
/// lines are fed to its stdin one at a time, followed by the caller's own
/// stdin; in batch mode the lines are joined and passed to a single
/// `shell -c` invocation. Either way the run surfaces its post-run
/// environment through a NUL-separated dump written by an `EXIT` trap to a
/// private temp file, which the governing session absorbs afterwards.
#[derive(Debug)]
pub struct Shell {
    pub config: ExecutableConfig,
    pub cmds: Vec<String>,
    pub custom_shell: Option<String>,
}

impl Shell {
    pub async fn run(&self, cancel: &CancellationToken) -> Result<i32, RunnerError> {
        let program = self.shell_program();
        let dump = env_dump_file()?;
        let trap = env_dump_trap(dump.path());

        let (command, rendered, feed) = if self.config.tty {
            let mut script = trap;
            for cmd in &self.cmds {
                script.push('\n');
                script.push_str(cmd);
            }
            script.push('\n');
            (Command::new(&program), program, Some(script))
        } else {
            let script = format!("{trap}\n{}", self.cmds.join("\n"));
            let mut command = Command::new(&program);
            command.arg("-c").arg(script);
            (command, format!("{program} -c <script>"), None)
        };

        let code = spawn_and_stream(&self.config, command, &rendered, feed, cancel).await?;
        absorb_env_dump(&self.config, dump.path());
        Ok(code)
    }

    pub async fn dry_run(&self, out: &mut (dyn AsyncWrite + Send + Unpin)) -> io::Result<()> {
        for cmd in &self.cmds {
            out.write_all(cmd.as_bytes()).await?;
            out.write_all(b"\n").await?;
        }
        out.flush().await
    }

    /// The shell to invoke: explicit override, then the session's `$SHELL`,
    /// then the platform default.
    pub fn shell_program(&self) -> String {
        shell_program(self.custom_shell.as_deref(), &self.config)
    }
}

fn shell_program(custom_shell: Option<&str>, config: &ExecutableConfig) -> String {
    if let Some(shell) = custom_shell {
        if !shell.is_empty() {
            return shell.to_owned();
        }
    }
    let env = config.session.env_snapshot();
    match env.get("SHELL") {
        Some(shell) if !shell.is_empty() => shell.to_owned(),
        _ => DEFAULT_SHELL.to_owned(),
    }
}

/// A block whose whole content goes to one non-interactive `shell -c` call.
///
/// Used when line-splitting would corrupt semantics: heredocs and other
/// multi-line constructs. Never wires stdin through, regardless of the
/// block's interactivity flag.
#[derive(Debug)]
pub struct ShellRaw {
    pub config: ExecutableConfig,
    pub lines: Vec<String>,
    pub content: String,
    pub custom_shell: Option<String>,
}

impl ShellRaw {
    pub async fn run(&self, cancel: &CancellationToken) -> Result<i32, RunnerError> {
        let program = shell_program(self.custom_shell.as_deref(), &self.config);
        // Force batch mode: raw blocks never wire stdin through.
        let config = ExecutableConfig {
            tty: false,
            ..self.config.clone()
        };

        let dump = env_dump_file()?;
        let script = format!("{}\n{}", env_dump_trap(dump.path()), self.content);
        let mut command = Command::new(&program);
        command.arg("-c").arg(script);

        let rendered = format!("{program} -c <raw block>");
        let code = spawn_and_stream(&config, command, &rendered, None, cancel).await?;
        absorb_env_dump(&self.config, dump.path());
        Ok(code)
    }

    pub async fn dry_run(&self, out: &mut (dyn AsyncWrite + Send + Unpin)) -> io::Result<()> {
        out.write_all(self.content.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await
    }
}

fn env_dump_file() -> Result<tempfile::NamedTempFile, RunnerError> {
    tempfile::Builder::new()
        .prefix("runme-env-")
        .tempfile()
        .map_err(|e| RunnerError::config(format!("failed to create env side channel: {e}")))
}

/// Refresh the session snapshot from the side-channel dump, when present.
fn absorb_env_dump(config: &ExecutableConfig, path: &Path) {
    match std::fs::read(path) {
        Ok(bytes) if !bytes.is_empty() => {
            config
                .session
                .refresh(EnvSnapshot::parse_null_delimited(&bytes));
        }
        Ok(_) => {}
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no env dump to absorb");
        }
    }
}

#[cfg(test)]
#[path = "shell.test.rs"]
mod tests;
