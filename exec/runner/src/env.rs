//! Ordered environment snapshots.

/// An ordered mapping of environment variable name to value.
///
/// Names are unique; insertion order is preserved and matters only for
/// rendering, not semantics. A snapshot is owned by exactly one session and
/// is copied, never silently shared.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    entries: Vec<(String, String)>,
}

impl EnvSnapshot {
    /// Capture the current process environment.
    pub fn from_host() -> Self {
        Self::from_pairs(std::env::vars())
    }

    /// Build a snapshot from name/value pairs. Later duplicates win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut snapshot = Self::default();
        for (name, value) in pairs {
            snapshot.set(name.into(), value.into());
        }
        snapshot
    }

    /// Set a variable, replacing any existing value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up a variable by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Remove a variable. Returns true if it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(n, _)| n != name);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Consume the snapshot into its ordered pairs.
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.entries
    }

    /// Parse a NUL-delimited `env -0` dump, as written by the shell
    /// executable's side-channel trap.
    ///
    /// Entries without a `=` separator are skipped; values keep embedded
    /// newlines intact, which is the point of the NUL framing.
    pub fn parse_null_delimited(bytes: &[u8]) -> Self {
        let mut snapshot = Self::default();
        for entry in bytes.split(|b| *b == 0) {
            if entry.is_empty() {
                continue;
            }
            let text = String::from_utf8_lossy(entry);
            if let Some((name, value)) = text.split_once('=') {
                if !name.is_empty() {
                    snapshot.set(name, value);
                }
            }
        }
        snapshot
    }
}

#[cfg(test)]
#[path = "env.test.rs"]
mod tests;
