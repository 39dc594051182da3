use std::io;
use std::path::PathBuf;

use super::*;

#[test]
fn execution_error_exposes_exit_code() {
    let err = RunnerError::Execution {
        name: "deploy".into(),
        code: 42,
    };
    assert_eq!(err.exit_code(), Some(42));
    assert_eq!(err.to_string(), "block \"deploy\" exited with code 42");
}

#[test]
fn non_execution_errors_carry_no_exit_code() {
    let err = RunnerError::UnsupportedLanguage {
        language: "cobol".into(),
    };
    assert_eq!(err.exit_code(), None);
}

#[test]
fn spawn_error_preserves_source() {
    let err = RunnerError::Spawn {
        command: "missing-shell -c true".into(),
        dir: PathBuf::from("/work"),
        source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
    };
    let source = std::error::Error::source(&err).expect("source");
    assert!(source.to_string().contains("no such file"));
}
