use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

use super::*;
use crate::config::EXIT_PENDING;
use crate::config::ExecutableConfig;
use crate::config::ExitCell;
use crate::env::EnvSnapshot;
use crate::io::SharedBuffer;
use crate::io::StdinGate;
use crate::session::Session;

fn shell_exec(cmds: &[&str], stdout: &SharedBuffer, stderr: &SharedBuffer) -> Executable {
    let config = ExecutableConfig {
        name: "test".into(),
        dir: std::env::temp_dir(),
        tty: false,
        stdin: None,
        stdout: stdout.sink(),
        stderr: stderr.sink(),
        session: Arc::new(Session::new(EnvSnapshot::from_host())),
        pre_env: Vec::new(),
        env_overrides: Vec::new(),
        exit: ExitCell::new(),
        stdin_gate: StdinGate::default(),
    };
    Executable::Shell(Shell {
        config,
        cmds: cmds.iter().map(|c| (*c).to_owned()).collect(),
        custom_shell: Some("/bin/sh".to_owned()),
    })
}

#[tokio::test]
async fn streams_stdout_and_stderr_separately() {
    let (out, err) = (SharedBuffer::new(), SharedBuffer::new());
    let exec = shell_exec(&["echo to-stdout", "echo to-stderr >&2"], &out, &err);

    let code = exec.run(&CancellationToken::new()).await.expect("run");
    assert_eq!(code, 0);
    assert_eq!(out.to_string_lossy(), "to-stdout\n");
    assert_eq!(err.to_string_lossy(), "to-stderr\n");
}

#[tokio::test]
async fn reports_nonzero_exit_code() {
    let (out, err) = (SharedBuffer::new(), SharedBuffer::new());
    let exec = shell_exec(&["exit 42"], &out, &err);
    let code = exec.run(&CancellationToken::new()).await.expect("run");
    assert_eq!(code, 42);
    assert_eq!(exec.exit_code(), 42);
}

#[tokio::test]
async fn exit_code_is_pending_until_run_returns() {
    let (out, err) = (SharedBuffer::new(), SharedBuffer::new());
    let exec = Arc::new(shell_exec(&["sleep 0.3"], &out, &err));

    let runner = Arc::clone(&exec);
    let run = tokio::spawn(async move { runner.run(&CancellationToken::new()).await });

    // Poll while the child is alive: the cell must stay pending.
    for _ in 0..3 {
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(exec.exit_code(), EXIT_PENDING);
    }

    let code = run.await.expect("join").expect("run");
    assert_eq!(code, 0);
    assert_eq!(exec.exit_code(), 0);
}

#[tokio::test]
async fn cancellation_terminates_the_child_promptly() {
    let (out, err) = (SharedBuffer::new(), SharedBuffer::new());
    let exec = shell_exec(&["sleep 10"], &out, &err);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let code = exec.run(&cancel).await.expect("run returns after kill");
    let elapsed = started.elapsed();

    assert!(elapsed < Duration::from_secs(1), "took {elapsed:?}");
    assert_ne!(code, 0);
}

#[tokio::test]
async fn cancelled_token_prevents_spawn() {
    let (out, err) = (SharedBuffer::new(), SharedBuffer::new());
    let exec = shell_exec(&["echo never"], &out, &err);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = exec.run(&cancel).await;
    assert!(matches!(
        result,
        Err(runme_error::RunnerError::Spawn { .. })
    ));
    assert_eq!(exec.exit_code(), EXIT_PENDING);
    assert!(out.to_string_lossy().is_empty());
}

#[tokio::test]
async fn spawn_failure_carries_command_and_dir() {
    let (out, err) = (SharedBuffer::new(), SharedBuffer::new());
    let mut exec = shell_exec(&["echo hi"], &out, &err);
    if let Executable::Shell(shell) = &mut exec {
        shell.custom_shell = Some("/nonexistent-shell-binary".to_owned());
    }

    let result = exec.run(&CancellationToken::new()).await;
    match result {
        Err(runme_error::RunnerError::Spawn { command, .. }) => {
            assert!(command.contains("/nonexistent-shell-binary"));
        }
        other => panic!("expected spawn error, got {other:?}"),
    }
}
