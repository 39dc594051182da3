use pretty_assertions::assert_eq;

use super::*;

#[test]
fn set_preserves_insertion_order() {
    let mut env = EnvSnapshot::default();
    env.set("B", "2");
    env.set("A", "1");
    env.set("C", "3");
    let names: Vec<&str> = env.iter().map(|(n, _)| n).collect();
    assert_eq!(names, ["B", "A", "C"]);
}

#[test]
fn set_replaces_in_place() {
    let mut env = EnvSnapshot::default();
    env.set("A", "1");
    env.set("B", "2");
    env.set("A", "updated");
    assert_eq!(env.get("A"), Some("updated"));
    let names: Vec<&str> = env.iter().map(|(n, _)| n).collect();
    assert_eq!(names, ["A", "B"]);
}

#[test]
fn from_pairs_later_duplicates_win() {
    let env = EnvSnapshot::from_pairs([("A", "1"), ("A", "2")]);
    assert_eq!(env.len(), 1);
    assert_eq!(env.get("A"), Some("2"));
}

#[test]
fn remove_reports_presence() {
    let mut env = EnvSnapshot::from_pairs([("A", "1")]);
    assert!(env.remove("A"));
    assert!(!env.remove("A"));
    assert!(env.is_empty());
}

#[test]
fn parses_null_delimited_dump() {
    let dump = b"A=1\0B=first line\nsecond line\0\0MALFORMED\0C=x=y\0";
    let env = EnvSnapshot::parse_null_delimited(dump);
    assert_eq!(env.get("A"), Some("1"));
    assert_eq!(env.get("B"), Some("first line\nsecond line"));
    assert_eq!(env.get("C"), Some("x=y"));
    assert_eq!(env.len(), 3);
}

#[test]
fn host_snapshot_is_not_empty() {
    assert!(!EnvSnapshot::from_host().is_empty());
}
