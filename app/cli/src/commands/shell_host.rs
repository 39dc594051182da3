//! The `shell` subcommand: host a background shell behind a socket.
//!
//! This is the owning end of the rendezvous the runner writes to: it binds
//! `runme-<pid>.sock`, spawns an interactive shell with `RUNMESHELL=<pid>`
//! exported, and feeds the shell's stdin from both the user's terminal and
//! lines arriving on the socket. The socket file is removed here on exit;
//! runners never delete it.

#[cfg(unix)]
pub async fn shell() -> anyhow::Result<()> {
    use std::process::Stdio;

    use anyhow::Context;
    use runme_runner::shell_socket;
    use tokio::io::AsyncBufReadExt;
    use tokio::io::AsyncWriteExt;
    use tokio::io::BufReader;
    use tokio::net::UnixListener;
    use tokio::sync::mpsc;

    let id = std::process::id();
    let path = shell_socket::socket_path(&std::env::temp_dir(), id);
    let listener = UnixListener::bind(&path)
        .with_context(|| format!("failed to bind {}", path.display()))?;

    let program = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_owned());
    let mut child = tokio::process::Command::new(&program)
        .env(shell_socket::SHELL_ID_ENV, id.to_string())
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to start shell {program}"))?;
    let mut child_stdin = child
        .stdin
        .take()
        .context("shell child has no stdin pipe")?;

    eprintln!("background shell {id} listening on {}", path.display());

    let (tx, mut rx) = mpsc::channel::<String>(64);

    // Terminal input.
    let term_tx = tx.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if term_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    // Forwarded commands.
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let conn_tx = tx.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stream).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if conn_tx.send(line).await.is_err() {
                        break;
                    }
                }
            });
        }
    });

    let mut input_open = true;
    let status = loop {
        tokio::select! {
            line = rx.recv(), if input_open => {
                match line {
                    Some(line) => {
                        child_stdin.write_all(line.as_bytes()).await?;
                        child_stdin.write_all(b"\n").await?;
                        child_stdin.flush().await?;
                    }
                    None => input_open = false,
                }
            }
            status = child.wait() => break status?,
        }
    };

    let _ = std::fs::remove_file(&path);
    tracing::debug!(code = status.code(), "background shell exited");
    Ok(())
}

#[cfg(not(unix))]
pub async fn shell() -> anyhow::Result<()> {
    anyhow::bail!("background shells require unix domain sockets")
}
