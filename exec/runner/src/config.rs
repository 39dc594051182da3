//! Executable configuration and the shared exit-status cell.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicI32;
use std::sync::atomic::Ordering;

use tokio::sync::Notify;

use crate::io::OutputSink;
use crate::io::StdinGate;
use crate::io::StdinSource;
use crate::session::Session;

/// Exit code reported while an execution is still in flight.
pub const EXIT_PENDING: i32 = -1;

/// Shared exit-status cell with completion notification.
///
/// Holds [`EXIT_PENDING`] until the process terminates, then the final
/// status, exactly once. Safe to poll from any task while the run is in
/// progress; `wait` parks on a notification instead of polling.
#[derive(Clone, Debug)]
pub struct ExitCell {
    code: Arc<AtomicI32>,
    done: Arc<Notify>,
}

impl ExitCell {
    pub fn new() -> Self {
        Self {
            code: Arc::new(AtomicI32::new(EXIT_PENDING)),
            done: Arc::new(Notify::new()),
        }
    }

    /// The current value: [`EXIT_PENDING`] before completion, the final
    /// process status afterwards.
    pub fn get(&self) -> i32 {
        self.code.load(Ordering::SeqCst)
    }

    /// Record the final status and wake all waiters.
    pub fn set(&self, code: i32) {
        self.code.store(code, Ordering::SeqCst);
        self.done.notify_waiters();
    }

    /// Wait until the status is recorded.
    pub async fn wait(&self) -> i32 {
        loop {
            let notified = self.done.notified();
            let code = self.get();
            if code != EXIT_PENDING {
                return code;
            }
            notified.await;
        }
    }
}

impl Default for ExitCell {
    fn default() -> Self {
        Self::new()
    }
}

/// The single struct every executable variant is built from.
///
/// A runner never runs a block without first producing one complete
/// configuration.
#[derive(Clone, Debug)]
pub struct ExecutableConfig {
    /// Block name, used in diagnostics and error values.
    pub name: String,
    /// Working directory for the child process.
    pub dir: PathBuf,
    /// Whether the caller's stdin is wired through.
    pub tty: bool,
    /// Caller stdin, present only for interactive blocks.
    pub stdin: Option<StdinSource>,
    pub stdout: OutputSink,
    pub stderr: OutputSink,
    /// The governing session; supplies the child environment base and
    /// absorbs the post-run environment of shell-based variants.
    pub session: Arc<Session>,
    /// Project-level overlay, applied over the session snapshot.
    pub pre_env: Vec<(String, String)>,
    /// Per-run overrides, highest precedence.
    pub env_overrides: Vec<(String, String)>,
    pub exit: ExitCell,
    pub stdin_gate: StdinGate,
}

impl ExecutableConfig {
    /// Assemble the child environment.
    ///
    /// Precedence, lowest to highest: session snapshot, project overlay,
    /// per-run overrides.
    pub fn child_env(&self) -> Vec<(String, String)> {
        let mut env = self.session.env_snapshot();
        for (name, value) in &self.pre_env {
            env.set(name.clone(), value.clone());
        }
        for (name, value) in &self.env_overrides {
            env.set(name.clone(), value.clone());
        }
        env.into_pairs()
    }
}

#[cfg(test)]
#[path = "config.test.rs"]
mod tests;
