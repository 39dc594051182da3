//! Reusable shell-state container.

use std::sync::RwLock;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use tokio::sync::Mutex;
use tokio::sync::MutexGuard;

use crate::env::EnvSnapshot;

/// A named, reusable container of shell-like state spanning executions.
///
/// A session owns one environment snapshot and is shared across sequential
/// executable runs within the same runner, so `cd` effects and exported
/// variables carry over. The run lock enforces the single-writer discipline:
/// the runner holds it for the whole spawn-to-env-refresh window, so
/// execution *i+1* never starts before execution *i*'s environment effects
/// are committed. Snapshot reads are safe at any time.
#[derive(Debug)]
pub struct Session {
    id: String,
    env: RwLock<EnvSnapshot>,
    cleanup_on_exit: AtomicBool,
    run_lock: Mutex<()>,
}

impl Session {
    /// Create a session capturing `initial` as its starting snapshot.
    pub fn new(initial: EnvSnapshot) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            env: RwLock::new(initial),
            cleanup_on_exit: AtomicBool::new(false),
            run_lock: Mutex::new(()),
        }
    }

    /// The session's opaque identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// A copy of the current environment snapshot.
    pub fn env_snapshot(&self) -> EnvSnapshot {
        self.env.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Replace the snapshot with the environment observed after a run.
    pub fn refresh(&self, observed: EnvSnapshot) {
        *self.env.write().unwrap_or_else(|e| e.into_inner()) = observed;
    }

    /// Export a single variable into the snapshot.
    pub fn export(&self, name: impl Into<String>, value: impl Into<String>) {
        self.env
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .set(name, value);
    }

    /// Drop all session state.
    pub fn clear(&self) {
        *self.env.write().unwrap_or_else(|e| e.into_inner()) = EnvSnapshot::default();
    }

    pub fn set_cleanup_on_exit(&self, cleanup: bool) {
        self.cleanup_on_exit.store(cleanup, Ordering::Relaxed);
    }

    pub fn cleanup_on_exit(&self) -> bool {
        self.cleanup_on_exit.load(Ordering::Relaxed)
    }

    /// Acquire the run lock, serializing executions on this session.
    pub async fn lock_for_run(&self) -> MutexGuard<'_, ()> {
        self.run_lock.lock().await
    }
}

#[cfg(test)]
#[path = "session.test.rs"]
mod tests;
