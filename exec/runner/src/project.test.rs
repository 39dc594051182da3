use pretty_assertions::assert_eq;

use super::*;

#[test]
fn loads_env_file_pairs_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join(".env"), "A=1\nB=two words\n").expect("write");

    let project = Project::new(dir.path());
    let pairs = project.load_envs().expect("load");
    assert_eq!(
        pairs,
        vec![
            ("A".to_owned(), "1".to_owned()),
            ("B".to_owned(), "two words".to_owned()),
        ]
    );
}

#[test]
fn missing_env_file_is_not_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let project = Project::new(dir.path());
    assert!(project.load_envs().expect("load").is_empty());
}

#[test]
fn later_files_append_after_earlier_ones() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join(".env"), "A=base\n").expect("write");
    std::fs::write(dir.path().join(".env.local"), "A=local\n").expect("write");

    let project = Project::new(dir.path()).with_env_file(".env.local");
    let pairs = project.load_envs().expect("load");
    assert_eq!(pairs.last().map(|(_, v)| v.as_str()), Some("local"));
}
