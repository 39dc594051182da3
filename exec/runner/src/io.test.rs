use pretty_assertions::assert_eq;

use super::*;

#[tokio::test]
async fn shared_buffer_collects_sink_writes() {
    let buffer = SharedBuffer::new();
    let sink = buffer.sink();
    sink.write_all(b"first ").await.expect("write");
    sink.write_all(b"second").await.expect("write");
    assert_eq!(buffer.to_string_lossy(), "first second");
}

#[tokio::test]
async fn cloned_sinks_share_one_target() {
    let buffer = SharedBuffer::new();
    let a = buffer.sink();
    let b = a.clone();
    a.write_all(b"a").await.expect("write");
    b.write_all(b"b").await.expect("write");
    assert_eq!(buffer.to_string_lossy(), "ab");
}

#[test]
fn stdin_source_is_taken_once() {
    let source = StdinSource::new(tokio::io::empty());
    assert!(source.take().is_some());
    assert!(source.take().is_none());
    assert!(source.clone().take().is_none());
}

#[tokio::test]
async fn stdin_gate_closes_exactly_once() {
    let gate = StdinGate::default();
    assert!(!gate.close());

    let task = tokio::spawn(std::future::pending::<()>());
    gate.arm(task.abort_handle());
    assert!(gate.close());
    assert!(!gate.close());
    assert!(task.await.expect_err("aborted").is_cancelled());
}
