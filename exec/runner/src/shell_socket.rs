//! Background-shell socket client.
//!
//! A background shell is a separately managed, long-lived interactive shell
//! reachable through a Unix domain socket at `<runtime-dir>/runme-<id>.sock`.
//! The runner only ever *writes* to that socket; the socket's lifecycle
//! (bind, permissions, removal) belongs to whatever started the shell.
//!
//! The protocol is fire-and-forget: one whitespace-trimmed command per line,
//! newline-terminated, no acknowledgement read back. Delivery is therefore
//! at most once. The shell echoes output through its own attached terminal,
//! not through this connection.

use std::path::Path;
use std::path::PathBuf;

#[cfg(unix)]
use runme_error::RunnerError;
#[cfg(unix)]
use tokio::io::AsyncWriteExt;
#[cfg(unix)]
use tokio::net::UnixStream;

/// Environment variable carrying the active shell id to child processes.
pub const SHELL_ID_ENV: &str = "RUNMESHELL";

/// The rendezvous path for a shell id inside `dir`.
pub fn socket_path(dir: &Path, id: u32) -> PathBuf {
    dir.join(format!("runme-{id}.sock"))
}

/// Boundary adapter: read the active shell id from the process environment.
///
/// Unset or non-numeric means "not inside a managed shell", never an error.
/// The core runner never calls this itself; callers resolve the id at the
/// edge and pass it in as configuration.
pub fn shell_id_from_env() -> Option<u32> {
    std::env::var(SHELL_ID_ENV).ok()?.trim().parse().ok()
}

/// Forward block lines to the background shell behind `path`.
///
/// Dials a fresh connection, writes each line trimmed and
/// newline-terminated, and returns without waiting for any response.
#[cfg(unix)]
pub async fn forward_lines(path: &Path, lines: &[String]) -> Result<(), RunnerError> {
    let sock_err = |source: std::io::Error| RunnerError::Socket {
        path: path.to_path_buf(),
        source,
    };

    let mut conn = UnixStream::connect(path).await.map_err(sock_err)?;
    for line in lines {
        conn.write_all(line.trim().as_bytes())
            .await
            .map_err(sock_err)?;
        conn.write_all(b"\n").await.map_err(sock_err)?;
    }
    conn.flush().await.map_err(sock_err)?;
    Ok(())
}

#[cfg(test)]
#[path = "shell_socket.test.rs"]
mod tests;
