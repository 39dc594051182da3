use std::sync::Arc;

use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

use super::*;
use crate::config::EXIT_PENDING;
use crate::config::ExitCell;
use crate::io::SharedBuffer;
use crate::io::StdinGate;
use crate::io::StdinSource;
use crate::session::Session;

fn config(session: Arc<Session>, out: &SharedBuffer, err: &SharedBuffer) -> ExecutableConfig {
    ExecutableConfig {
        name: "test".into(),
        dir: std::env::temp_dir(),
        tty: false,
        stdin: None,
        stdout: out.sink(),
        stderr: err.sink(),
        session,
        pre_env: Vec::new(),
        env_overrides: Vec::new(),
        exit: ExitCell::new(),
        stdin_gate: StdinGate::default(),
    }
}

fn host_session() -> Arc<Session> {
    Arc::new(Session::new(EnvSnapshot::from_host()))
}

#[tokio::test]
async fn batch_mode_joins_lines_into_one_invocation() {
    let (out, err) = (SharedBuffer::new(), SharedBuffer::new());
    let shell = Shell {
        config: config(host_session(), &out, &err),
        cmds: vec!["GREETING=hello".into(), "echo \"$GREETING world\"".into()],
        custom_shell: Some("/bin/sh".into()),
    };
    let code = shell.run(&CancellationToken::new()).await.expect("run");
    assert_eq!(code, 0);
    assert_eq!(out.to_string_lossy(), "hello world\n");
}

#[tokio::test]
async fn session_absorbs_exported_variables() {
    let session = host_session();
    let (out, err) = (SharedBuffer::new(), SharedBuffer::new());
    let shell = Shell {
        config: config(Arc::clone(&session), &out, &err),
        cmds: vec!["export RUNME_TEST_EXPORT=absorbed".into()],
        custom_shell: Some("/bin/sh".into()),
    };
    shell.run(&CancellationToken::new()).await.expect("run");
    assert_eq!(
        session.env_snapshot().get("RUNME_TEST_EXPORT"),
        Some("absorbed")
    );
}

#[tokio::test]
async fn tty_mode_feeds_lines_and_wires_stdin_through() {
    let session = host_session();
    let (out, err) = (SharedBuffer::new(), SharedBuffer::new());
    let mut cfg = config(Arc::clone(&session), &out, &err);
    cfg.tty = true;
    // An immediately-EOF stdin: the shell sees the fed lines, then EOF.
    cfg.stdin = Some(StdinSource::new(tokio::io::empty()));

    let shell = Shell {
        config: cfg,
        cmds: vec!["echo interactive-ok".into()],
        custom_shell: Some("/bin/sh".into()),
    };
    let code = shell.run(&CancellationToken::new()).await.expect("run");
    assert_eq!(code, 0);
    assert_eq!(out.to_string_lossy(), "interactive-ok\n");
}

#[tokio::test]
async fn dry_run_is_pure_and_repeatable() {
    let session = host_session();
    let before = session.env_snapshot();
    let (out, err) = (SharedBuffer::new(), SharedBuffer::new());
    let shell = Shell {
        config: config(Arc::clone(&session), &out, &err),
        cmds: vec!["echo first".into(), "echo second".into()],
        custom_shell: Some("/bin/sh".into()),
    };

    let mut first = SharedBuffer::new();
    let mut second = SharedBuffer::new();
    shell.dry_run(&mut first).await.expect("dry run");
    shell.dry_run(&mut second).await.expect("dry run");

    assert_eq!(first.to_string_lossy(), "echo first\necho second\n");
    assert_eq!(first.to_string_lossy(), second.to_string_lossy());
    // No process, no exit status, no environment mutation.
    assert_eq!(shell.config.exit.get(), EXIT_PENDING);
    assert_eq!(session.env_snapshot(), before);
    assert!(out.to_string_lossy().is_empty());
}

#[tokio::test]
async fn raw_blocks_keep_heredocs_intact() {
    let (out, err) = (SharedBuffer::new(), SharedBuffer::new());
    let raw = ShellRaw {
        config: config(host_session(), &out, &err),
        lines: vec!["cat <<EOF".into(), "raw-body".into(), "EOF".into()],
        content: "cat <<EOF\nraw-body\nEOF".into(),
        custom_shell: Some("/bin/sh".into()),
    };
    let code = raw.run(&CancellationToken::new()).await.expect("run");
    assert_eq!(code, 0);
    assert_eq!(out.to_string_lossy(), "raw-body\n");
}

#[test]
fn shell_program_prefers_override_then_session_shell() {
    let session = Arc::new(Session::new(EnvSnapshot::from_pairs([(
        "SHELL", "/bin/bash",
    )])));
    let (out, err) = (SharedBuffer::new(), SharedBuffer::new());

    let with_override = Shell {
        config: config(Arc::clone(&session), &out, &err),
        cmds: Vec::new(),
        custom_shell: Some("/bin/zsh".into()),
    };
    assert_eq!(with_override.shell_program(), "/bin/zsh");

    let from_session = Shell {
        config: config(Arc::clone(&session), &out, &err),
        cmds: Vec::new(),
        custom_shell: None,
    };
    assert_eq!(from_session.shell_program(), "/bin/bash");

    let fallback = Shell {
        config: config(Arc::new(Session::new(EnvSnapshot::default())), &out, &err),
        cmds: Vec::new(),
        custom_shell: None,
    };
    assert_eq!(fallback.shell_program(), DEFAULT_SHELL);
}
