//! Executable variants and their shared process plumbing.
//!
//! An [`Executable`] is a fully configured, runnable representation of one
//! code block. Construction is a pure mapping from language tag to variant
//! (see [`crate::local::LocalRunner`]); running is delegated to one shared
//! spawn-and-stream path so every variant gets identical streaming,
//! cancellation, and exit-code behavior.

mod go_run;
mod shell;

use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use runme_error::RunnerError;
use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::process::Child;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub use go_run::GoScript;
pub use shell::Shell;
pub use shell::ShellRaw;

use crate::config::ExecutableConfig;
use crate::io::OutputSink;

/// How long a cancelled child gets between SIGTERM and SIGKILL.
const KILL_GRACE: Duration = Duration::from_secs(2);

/// A runnable representation of one code block.
#[derive(Debug)]
pub enum Executable {
    /// Lines fed to a shell session, one at a time or joined (§ TTY mode).
    Shell(Shell),
    /// Whole block content handed to one non-interactive `shell -c` call.
    ShellRaw(ShellRaw),
    /// Block content compiled and run by the Go toolchain as one unit.
    Go(GoScript),
}

impl Executable {
    /// Execute, blocking until the child terminates or `cancel` fires.
    ///
    /// Output streams to the configured sinks as produced. On cancellation
    /// the child receives SIGTERM (SIGKILL after a grace period) and the
    /// call returns promptly with the child's own exit status.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<i32, RunnerError> {
        match self {
            Self::Shell(shell) => shell.run(cancel).await,
            Self::ShellRaw(raw) => raw.run(cancel).await,
            Self::Go(go) => go.run(cancel).await,
        }
    }

    /// Render exactly what would run, without creating a process or
    /// mutating any state.
    pub async fn dry_run(&self, out: &mut (dyn AsyncWrite + Send + Unpin)) -> io::Result<()> {
        match self {
            Self::Shell(shell) => shell.dry_run(out).await,
            Self::ShellRaw(raw) => raw.dry_run(out).await,
            Self::Go(go) => go.dry_run(out).await,
        }
    }

    /// The exit status: [`crate::config::EXIT_PENDING`] until the run
    /// completes, then the final value. Safe to poll concurrently with
    /// [`Executable::run`].
    pub fn exit_code(&self) -> i32 {
        self.config().exit.get()
    }

    pub fn config(&self) -> &ExecutableConfig {
        match self {
            Self::Shell(shell) => &shell.config,
            Self::ShellRaw(raw) => &raw.config,
            Self::Go(go) => &go.config,
        }
    }

    /// Read-only access to the underlying source lines.
    pub fn lines(&self) -> &[String] {
        match self {
            Self::Shell(shell) => &shell.cmds,
            Self::ShellRaw(raw) => &raw.lines,
            Self::Go(go) => &go.lines,
        }
    }

    /// Read-only access to the underlying source.
    pub fn content(&self) -> String {
        match self {
            Self::Shell(shell) => shell.cmds.join("\n"),
            Self::ShellRaw(raw) => raw.content.clone(),
            Self::Go(go) => go.source.clone(),
        }
    }
}

/// Spawn `command` and stream its output until completion or cancellation.
///
/// `rendered` is the human-readable command used in error values. `feed` is
/// written into the child's stdin before the caller's stdin (if any) is
/// wired through.
pub(crate) async fn spawn_and_stream(
    config: &ExecutableConfig,
    mut command: Command,
    rendered: &str,
    feed: Option<String>,
    cancel: &CancellationToken,
) -> Result<i32, RunnerError> {
    let spawn_err = |source: io::Error| RunnerError::Spawn {
        command: rendered.to_owned(),
        dir: config.dir.clone(),
        source,
    };

    if cancel.is_cancelled() {
        return Err(spawn_err(io::Error::new(
            io::ErrorKind::Interrupted,
            "execution cancelled before spawn",
        )));
    }

    let caller_stdin = if config.tty {
        config.stdin.as_ref().and_then(|s| s.take())
    } else {
        None
    };
    let wants_stdin = feed.is_some() || caller_stdin.is_some();

    command
        .current_dir(&config.dir)
        .env_clear()
        .envs(config.child_env())
        .stdin(if wants_stdin {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command.spawn().map_err(spawn_err)?;
    tracing::debug!(command = rendered, dir = %config.dir.display(), "spawned block process");

    if let Some(mut child_stdin) = child.stdin.take() {
        let pump = tokio::spawn(async move {
            if let Some(text) = feed {
                if child_stdin.write_all(text.as_bytes()).await.is_err() {
                    return;
                }
            }
            match caller_stdin {
                Some(mut reader) => {
                    let _ = tokio::io::copy(&mut reader, &mut child_stdin).await;
                }
                // No more input: dropping the handle closes the pipe so the
                // child sees EOF after the fed script.
                None => drop(child_stdin),
            }
        });
        config.stdin_gate.arm(pump.abort_handle());
    }

    let stdout_task = stream_output(child.stdout.take(), config.stdout.clone());
    let stderr_task = stream_output(child.stderr.take(), config.stderr.clone());

    let (status, cancelled) = tokio::select! {
        status = child.wait() => (status.map_err(spawn_err)?, false),
        _ = cancel.cancelled() => {
            tracing::debug!(command = rendered, "cancellation requested, terminating child");
            (terminate(&mut child).await.map_err(spawn_err)?, true)
        }
    };

    // Drain the pipes on a clean exit. After a kill, a surviving
    // grandchild can hold the write ends open indefinitely, so the readers
    // are abandoned instead of awaited.
    for task in [stdout_task, stderr_task].into_iter().flatten() {
        if cancelled {
            task.abort();
        } else {
            let _ = task.await;
        }
    }
    config.stdin_gate.close();

    let code = exit_code_of(status);
    config.exit.set(code);
    Ok(code)
}

/// Copy a child output pipe into a sink, chunk by chunk, as produced.
fn stream_output<R>(reader: Option<R>, sink: OutputSink) -> Option<JoinHandle<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    reader.map(|mut reader| {
        tokio::spawn(async move {
            let mut buf = [0u8; 4096];
            loop {
                match reader.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if sink.write_all(&buf[..n]).await.is_err() {
                            break;
                        }
                    }
                }
            }
        })
    })
}

/// SIGTERM first, SIGKILL after [`KILL_GRACE`].
async fn terminate(child: &mut Child) -> io::Result<std::process::ExitStatus> {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        // SAFETY: sending a signal to our own child's pid.
        unsafe {
            libc::kill(pid as i32, libc::SIGTERM);
        }
    }
    #[cfg(not(unix))]
    child.start_kill()?;

    match tokio::time::timeout(KILL_GRACE, child.wait()).await {
        Ok(status) => status,
        Err(_) => {
            child.start_kill()?;
            child.wait().await
        }
    }
}

fn exit_code_of(status: std::process::ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        status
            .code()
            .unwrap_or_else(|| 128 + status.signal().unwrap_or(0))
    }
    #[cfg(not(unix))]
    status.code().unwrap_or(-1)
}

/// Render the side-channel trap that dumps the post-run environment.
pub(crate) fn env_dump_trap(path: &Path) -> String {
    format!("trap 'env -0 > \"{}\"' EXIT", path.display())
}

#[cfg(test)]
#[path = "mod.test.rs"]
mod tests;
