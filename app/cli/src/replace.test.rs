use pretty_assertions::assert_eq;

use super::*;

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

#[test]
fn substitutes_first_match_per_line() {
    let out = apply(
        &["s/foo/bar/".to_owned()],
        lines(&["foo and foo", "no match"]),
    )
    .expect("apply");
    assert_eq!(out, lines(&["bar and foo", "no match"]));
}

#[test]
fn global_flag_replaces_every_occurrence() {
    let out = apply(&["s/o/0/g".to_owned()], lines(&["foo boo"])).expect("apply");
    assert_eq!(out, lines(&["f00 b00"]));
}

#[test]
fn case_insensitive_flag() {
    let out = apply(&["s/hello/hi/i".to_owned()], lines(&["HELLO world"])).expect("apply");
    assert_eq!(out, lines(&["hi world"]));
}

#[test]
fn scripts_apply_in_order() {
    let out = apply(
        &["s/a/b/".to_owned(), "s/b/c/".to_owned()],
        lines(&["a"]),
    )
    .expect("apply");
    assert_eq!(out, lines(&["c"]));
}

#[test]
fn alternate_delimiters_and_capture_groups() {
    let out = apply(
        &["s#(\\w+)=(\\w+)#$2=$1#".to_owned()],
        lines(&["key=value"]),
    )
    .expect("apply");
    assert_eq!(out, lines(&["value=key"]));
}

#[test]
fn escaped_delimiter_stays_literal() {
    let out = apply(&["s/a\\/b/x/".to_owned()], lines(&["a/b"])).expect("apply");
    assert_eq!(out, lines(&["x"]));
}

#[test]
fn empty_script_list_is_identity() {
    let input = lines(&["untouched"]);
    let out = apply(&[], input.clone()).expect("apply");
    assert_eq!(out, input);
}

#[test]
fn malformed_scripts_fail_before_any_rewrite() {
    assert!(apply(&["x/foo/bar/".to_owned()], lines(&["foo"])).is_err());
    assert!(apply(&["s/foo/bar".to_owned()], lines(&["foo"])).is_err());
    assert!(apply(&["s/foo/bar/z".to_owned()], lines(&["foo"])).is_err());
    assert!(apply(&["s/[unclosed/x/".to_owned()], lines(&["foo"])).is_err());
}
