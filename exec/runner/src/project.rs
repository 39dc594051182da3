//! Project-level environment overlay.

use std::path::PathBuf;

use runme_error::RunnerError;

/// A project directory whose env files feed the pre-execution overlay.
///
/// Missing env files are not an error; a file that exists but cannot be
/// parsed is. Loaded pairs sit between the session snapshot and per-run
/// overrides in the child-environment precedence order.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    env_files: Vec<String>,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            env_files: vec![".env".to_owned()],
        }
    }

    /// Add an env file name resolved against the project root.
    pub fn with_env_file(mut self, name: impl Into<String>) -> Self {
        self.env_files.push(name.into());
        self
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Load all configured env files in order. Later files win.
    pub fn load_envs(&self) -> Result<Vec<(String, String)>, RunnerError> {
        let mut pairs = Vec::new();
        for name in &self.env_files {
            let path = self.root.join(name);
            if !path.exists() {
                continue;
            }
            let iter = dotenvy::from_path_iter(&path).map_err(|e| {
                RunnerError::config(format!("failed to read env file {}: {e}", path.display()))
            })?;
            for item in iter {
                let (key, value) = item.map_err(|e| {
                    RunnerError::config(format!("invalid entry in {}: {e}", path.display()))
                })?;
                pairs.push((key, value));
            }
        }
        Ok(pairs)
    }
}

#[cfg(test)]
#[path = "project.test.rs"]
mod tests;
