use pretty_assertions::assert_eq;

use super::*;

#[test]
fn socket_path_is_derived_from_shell_id() {
    let path = socket_path(std::path::Path::new("/run/user/1000"), 7);
    assert_eq!(path, std::path::PathBuf::from("/run/user/1000/runme-7.sock"));
}

#[test]
fn shell_id_discovery_tolerates_missing_and_garbage() {
    // SAFETY: env mutation, not run in parallel with other readers of this
    // variable.
    unsafe {
        std::env::remove_var(SHELL_ID_ENV);
        assert_eq!(shell_id_from_env(), None);

        std::env::set_var(SHELL_ID_ENV, "not-a-number");
        assert_eq!(shell_id_from_env(), None);

        std::env::set_var(SHELL_ID_ENV, " 42 ");
        assert_eq!(shell_id_from_env(), Some(42));

        std::env::remove_var(SHELL_ID_ENV);
    }
}

#[cfg(unix)]
#[tokio::test]
async fn forwards_trimmed_newline_terminated_lines() {
    use tokio::io::AsyncReadExt;

    let dir = tempfile::tempdir().expect("tempdir");
    let path = socket_path(dir.path(), 3);
    let listener = tokio::net::UnixListener::bind(&path).expect("bind");

    let accept = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut received = String::new();
        stream.read_to_string(&mut received).await.expect("read");
        received
    });

    let lines = vec!["  echo hi  ".to_owned(), "ls -la".to_owned()];
    forward_lines(&path, &lines).await.expect("forward");

    assert_eq!(accept.await.expect("join"), "echo hi\nls -la\n");
}

#[cfg(unix)]
#[tokio::test]
async fn dial_failure_is_a_socket_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = socket_path(dir.path(), 99);
    let err = forward_lines(&path, &["echo".to_owned()])
        .await
        .expect_err("no listener");
    assert!(matches!(err, RunnerError::Socket { .. }));
}
