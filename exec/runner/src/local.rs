//! Local execution of code blocks as native child processes.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use runme_document::FileCodeBlock;
use runme_error::RunnerError;
use tokio::io::AsyncWrite;
use tokio_util::sync::CancellationToken;

use crate::config::ExecutableConfig;
use crate::config::ExitCell;
use crate::env::EnvSnapshot;
use crate::executable::Executable;
use crate::executable::GoScript;
use crate::executable::Shell;
use crate::executable::ShellRaw;
use crate::io::OutputSink;
use crate::io::StdinGate;
use crate::io::StdinSource;
use crate::project::Project;
use crate::runner::Runner;
use crate::runner::SessionStrategy;
use crate::session::Session;
use crate::shell_socket;

/// Runs executables as child processes on the current host.
///
/// When configured with an active shell id, block execution bypasses
/// process creation entirely and forwards the block's lines to the
/// background shell's socket instead: the caller is already *inside* a
/// persistent shell, and commands should execute there.
///
/// Exactly one of {spawn a new process, route to the existing shell} is
/// chosen per run, decided solely by whether a shell id is set.
#[derive(Clone, Debug)]
pub struct LocalRunner {
    dir: PathBuf,
    stdin: Option<StdinSource>,
    stdout: OutputSink,
    stderr: OutputSink,
    shell_id: Option<u32>,
    socket_dir: PathBuf,
    session: Arc<Session>,
    project: Option<Project>,
    custom_shell: Option<String>,
    env_overrides: Vec<(String, String)>,
}

impl LocalRunner {
    /// A runner over a fresh session seeded from the host environment,
    /// writing to the process's own stdout/stderr.
    pub fn new() -> Self {
        Self::with_session(Arc::new(Session::new(EnvSnapshot::from_host())))
    }

    /// A runner bound to an existing session.
    pub fn with_session(session: Arc<Session>) -> Self {
        Self {
            dir: PathBuf::from("."),
            stdin: None,
            stdout: OutputSink::stdout(),
            stderr: OutputSink::stderr(),
            shell_id: None,
            socket_dir: std::env::temp_dir(),
            session,
            project: None,
            custom_shell: None,
            env_overrides: Vec::new(),
        }
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn with_stdin(mut self, stdin: StdinSource) -> Self {
        self.stdin = Some(stdin);
        self
    }

    pub fn with_stdout(mut self, stdout: OutputSink) -> Self {
        self.stdout = stdout;
        self
    }

    pub fn with_stderr(mut self, stderr: OutputSink) -> Self {
        self.stderr = stderr;
        self
    }

    pub fn with_project(mut self, project: Project) -> Self {
        self.project = Some(project);
        self
    }

    pub fn with_custom_shell(mut self, shell: impl Into<String>) -> Self {
        self.custom_shell = Some(shell.into());
        self
    }

    /// Route subsequent executions into the background shell `id`.
    pub fn with_shell_id(mut self, id: Option<u32>) -> Self {
        self.shell_id = id;
        self
    }

    /// Override the socket rendezvous directory. Defaults to the platform
    /// temp directory; tests point it at a scratch dir.
    pub fn with_socket_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.socket_dir = dir.into();
        self
    }

    /// Add a per-run environment override (highest precedence).
    pub fn with_env_override(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_overrides.push((name.into(), value.into()));
        self
    }

    pub fn with_cleanup_session(self, cleanup: bool) -> Self {
        self.session.set_cleanup_on_exit(cleanup);
        self
    }

    // Remote-only knobs, accepted so callers can configure either variant
    // through one code path.

    pub fn with_session_id(self, _id: impl Into<String>) -> Self {
        self
    }

    pub fn with_session_strategy(self, _strategy: SessionStrategy) -> Self {
        self
    }

    pub fn with_insecure(self, _insecure: bool) -> Self {
        self
    }

    pub fn with_tls_dir(self, _dir: impl Into<PathBuf>) -> Self {
        self
    }

    pub fn with_enable_background_processes(self, _enable: bool) -> Self {
        self
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn shell_id(&self) -> Option<u32> {
        self.shell_id
    }

    /// Build the executable for a block, or `None` when the block carries
    /// an empty language tag and no shell hint ("not yet resolvable").
    ///
    /// The mapping from language tag to variant lives here, in one place,
    /// so it stays exhaustive and testable.
    pub fn new_executable(
        &self,
        file_block: &FileCodeBlock,
    ) -> Result<Option<Executable>, RunnerError> {
        let block = &file_block.block;

        let custom_shell = file_block
            .frontmatter
            .shell
            .clone()
            .or_else(|| self.custom_shell.clone());

        // Blocks run relative to the document that declared them.
        let mut dir = self.dir.clone();
        if let Some(file) = &file_block.file {
            if let Some(parent) = file.parent() {
                dir = self.dir.join(parent);
            }
        }

        let pre_env = match &self.project {
            Some(project) => project.load_envs()?,
            None => Vec::new(),
        };

        let config = ExecutableConfig {
            name: block.name().to_owned(),
            dir,
            tty: block.interactive(),
            stdin: if block.interactive() {
                self.stdin.clone()
            } else {
                None
            },
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone(),
            session: Arc::clone(&self.session),
            pre_env,
            env_overrides: self.env_overrides.clone(),
            exit: ExitCell::new(),
            stdin_gate: StdinGate::default(),
        };

        let executable = match block.language() {
            "bash" | "bat" | "sh" | "shell" | "zsh" => Executable::Shell(Shell {
                config,
                cmds: block.lines().to_vec(),
                custom_shell,
            }),
            "sh-raw" => Executable::ShellRaw(ShellRaw {
                config,
                lines: block.lines().to_vec(),
                content: block.content().to_owned(),
                custom_shell,
            }),
            "go" => Executable::Go(GoScript {
                config,
                source: block.content().to_owned(),
                lines: block.lines().to_vec(),
            }),
            "" => {
                if custom_shell.is_some() {
                    Executable::Shell(Shell {
                        config,
                        cmds: block.lines().to_vec(),
                        custom_shell,
                    })
                } else {
                    return Ok(None);
                }
            }
            other => {
                return Err(RunnerError::UnsupportedLanguage {
                    language: other.to_owned(),
                });
            }
        };

        Ok(Some(executable))
    }

    #[cfg(unix)]
    async fn run_block_in_shell(&self, id: u32, block: &FileCodeBlock) -> Result<(), RunnerError> {
        let path = shell_socket::socket_path(&self.socket_dir, id);
        tracing::debug!(shell_id = id, socket = %path.display(), "routing block into background shell");
        shell_socket::forward_lines(&path, block.block.lines()).await
    }

    #[cfg(not(unix))]
    async fn run_block_in_shell(&self, id: u32, _block: &FileCodeBlock) -> Result<(), RunnerError> {
        let _ = shell_socket::socket_path(&self.socket_dir, id);
        Err(RunnerError::config(
            "background shells require unix domain sockets",
        ))
    }
}

impl Default for LocalRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Runner for LocalRunner {
    async fn run_block(
        &self,
        block: &FileCodeBlock,
        cancel: &CancellationToken,
    ) -> Result<(), RunnerError> {
        if let Some(id) = self.shell_id {
            return self.run_block_in_shell(id, block).await;
        }

        let Some(executable) = self.new_executable(block)? else {
            tracing::warn!(
                name = block.block.name(),
                "block has no language tag, nothing to execute"
            );
            return Ok(());
        };

        // Single-writer discipline: one execution at a time per session,
        // held through the env-refresh window.
        let _run_guard = self.session.lock_for_run().await;

        if block.block.interactive() {
            let exit = executable.config().exit.clone();
            let gate = executable.config().stdin_gate.clone();
            tokio::spawn(async move {
                exit.wait().await;
                gate.close();
            });
        }

        let code = executable.run(cancel).await?;
        if code != 0 {
            return Err(RunnerError::Execution {
                name: block.block.name().to_owned(),
                code,
            });
        }
        Ok(())
    }

    async fn dry_run_block(
        &self,
        block: &FileCodeBlock,
        out: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<(), RunnerError> {
        let Some(executable) = self.new_executable(block)? else {
            return Ok(());
        };
        executable
            .dry_run(out)
            .await
            .map_err(|e| RunnerError::config(format!("failed to render dry run: {e}")))
    }

    async fn cleanup(&self) -> Result<(), RunnerError> {
        if self.session.cleanup_on_exit() {
            self.session.clear();
        }
        Ok(())
    }

    fn clone_runner(&self) -> Box<dyn Runner> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
#[path = "local.test.rs"]
mod tests;
