use pretty_assertions::assert_eq;

use super::*;

#[test]
fn document_without_header_parses_to_default() {
    let (fm, body) = split("# Title\n").expect("split");
    assert_eq!(fm, Frontmatter::default());
    assert_eq!(body, "# Title\n");
}

#[test]
fn parses_shell_override() {
    let source = "---\nshell: /bin/zsh\n---\n# Title\n";
    let (fm, body) = split(source).expect("split");
    assert_eq!(fm.shell.as_deref(), Some("/bin/zsh"));
    assert_eq!(body, "# Title\n");
}

#[test]
fn empty_header_is_default() {
    let (fm, _) = split("---\n---\nbody\n").expect("split");
    assert_eq!(fm, Frontmatter::default());
}

#[test]
fn unclosed_header_is_an_error() {
    let err = split("---\nshell: sh\n").expect_err("must fail");
    assert!(err.to_string().contains("frontmatter"));
}

#[test]
fn thematic_break_is_not_a_header() {
    let (fm, body) = split("----\ntext\n").expect("split");
    assert_eq!(fm, Frontmatter::default());
    assert!(body.starts_with("----"));
}
