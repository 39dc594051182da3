use std::time::Duration;

use super::*;

#[tokio::test]
async fn cloned_tokens_observe_the_same_scope() {
    let scope = SignalScope::install().expect("install");
    let a = scope.token();
    let b = scope.token();
    a.cancel();
    assert!(b.is_cancelled());
}

#[cfg(unix)]
#[tokio::test]
async fn interrupt_signal_cancels_the_token_once() {
    let scope = SignalScope::install().expect("install");
    let token = scope.token();
    assert!(!token.is_cancelled());

    // SAFETY: raising a signal we installed a handler for.
    unsafe {
        libc::raise(libc::SIGINT);
    }

    tokio::time::timeout(Duration::from_secs(2), token.cancelled())
        .await
        .expect("token cancelled after SIGINT");

    // A second delivery is a no-op against the already-cancelled token.
    unsafe {
        libc::raise(libc::SIGINT);
    }
    assert!(token.is_cancelled());
}
