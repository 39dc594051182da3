use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn captures_initial_snapshot() {
    let session = Session::new(EnvSnapshot::from_pairs([("A", "1")]));
    assert_eq!(session.env_snapshot().get("A"), Some("1"));
    assert!(!session.id().is_empty());
}

#[test]
fn sessions_have_distinct_ids() {
    let a = Session::new(EnvSnapshot::default());
    let b = Session::new(EnvSnapshot::default());
    assert_ne!(a.id(), b.id());
}

#[test]
fn refresh_replaces_snapshot() {
    let session = Session::new(EnvSnapshot::from_pairs([("OLD", "1")]));
    session.refresh(EnvSnapshot::from_pairs([("NEW", "2")]));
    let env = session.env_snapshot();
    assert_eq!(env.get("OLD"), None);
    assert_eq!(env.get("NEW"), Some("2"));
}

#[test]
fn export_and_clear() {
    let session = Session::new(EnvSnapshot::default());
    session.export("X", "y");
    assert_eq!(session.env_snapshot().get("X"), Some("y"));
    session.clear();
    assert!(session.env_snapshot().is_empty());
}

#[test]
fn cleanup_flag_round_trips() {
    let session = Session::new(EnvSnapshot::default());
    assert!(!session.cleanup_on_exit());
    session.set_cleanup_on_exit(true);
    assert!(session.cleanup_on_exit());
}

#[tokio::test]
async fn run_lock_serializes_executions() {
    let session = Arc::new(Session::new(EnvSnapshot::default()));
    let guard = session.lock_for_run().await;

    let contender = Arc::clone(&session);
    let waiting = tokio::spawn(async move {
        let _guard = contender.lock_for_run().await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!waiting.is_finished());

    drop(guard);
    waiting.await.expect("contender finishes after release");
}
