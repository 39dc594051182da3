use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use super::*;
use crate::env::EnvSnapshot;
use crate::io::SharedBuffer;

fn config_with(
    session_env: EnvSnapshot,
    pre_env: Vec<(String, String)>,
    env_overrides: Vec<(String, String)>,
) -> ExecutableConfig {
    let buffer = SharedBuffer::new();
    ExecutableConfig {
        name: "test".into(),
        dir: std::env::temp_dir(),
        tty: false,
        stdin: None,
        stdout: buffer.sink(),
        stderr: buffer.sink(),
        session: Arc::new(Session::new(session_env)),
        pre_env,
        env_overrides,
        exit: ExitCell::new(),
        stdin_gate: StdinGate::default(),
    }
}

#[test]
fn child_env_precedence_is_session_project_overrides() {
    let config = config_with(
        EnvSnapshot::from_pairs([("A", "2"), ("B", "3")]),
        vec![("A".to_owned(), "1".to_owned())],
        vec![("A".to_owned(), "4".to_owned())],
    );

    let env = config.child_env();
    let get = |name: &str| {
        env.iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    };
    assert_eq!(get("A"), Some("4"));
    assert_eq!(get("B"), Some("3"));
}

#[test]
fn project_overlay_beats_session() {
    let config = config_with(
        EnvSnapshot::from_pairs([("A", "session")]),
        vec![("A".to_owned(), "project".to_owned())],
        Vec::new(),
    );
    let env = config.child_env();
    assert_eq!(env, vec![("A".to_owned(), "project".to_owned())]);
}

#[test]
fn exit_cell_starts_pending() {
    let cell = ExitCell::new();
    assert_eq!(cell.get(), EXIT_PENDING);
    cell.set(7);
    assert_eq!(cell.get(), 7);
}

#[tokio::test]
async fn exit_cell_wait_wakes_on_set() {
    let cell = ExitCell::new();
    let waiter = cell.clone();
    let task = tokio::spawn(async move { waiter.wait().await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!task.is_finished());

    cell.set(0);
    let code = tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .expect("waiter wakes")
        .expect("join");
    assert_eq!(code, 0);
}

#[tokio::test]
async fn exit_cell_wait_returns_immediately_when_done() {
    let cell = ExitCell::new();
    cell.set(3);
    assert_eq!(cell.wait().await, 3);
}
