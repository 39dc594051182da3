use pretty_assertions::assert_eq;

use super::*;

#[test]
fn parses_plain_language_tag() {
    let info = parse_fence_info("sh");
    assert_eq!(info.language, "sh");
    assert!(info.attributes.is_empty());
}

#[test]
fn parses_language_with_attributes() {
    let info = parse_fence_info("sh {name=deploy interactive=true}");
    assert_eq!(info.language, "sh");
    assert_eq!(info.attributes.get("name").map(String::as_str), Some("deploy"));
    assert_eq!(
        info.attributes.get("interactive").map(String::as_str),
        Some("true")
    );
}

#[test]
fn tolerates_spaces_inside_braces() {
    let info = parse_fence_info("bash { name=setup }");
    assert_eq!(info.language, "bash");
    assert_eq!(info.attributes.get("name").map(String::as_str), Some("setup"));
}

#[test]
fn empty_info_yields_empty_language() {
    let info = parse_fence_info("");
    assert_eq!(info.language, "");
    assert!(info.attributes.is_empty());
}

#[test]
fn derives_name_from_first_command_word() {
    assert_eq!(derive_name("echo hello"), "echo");
    assert_eq!(derive_name("# comment\n./run.sh --all"), "run-sh");
}

#[test]
fn derives_fallback_name_for_empty_content() {
    assert_eq!(derive_name(""), "block");
    assert_eq!(derive_name("# only comments"), "block");
}

#[test]
fn with_lines_rebuilds_content() {
    let block = CodeBlock::new(
        "sh".into(),
        "echo".into(),
        "echo a\necho b".into(),
        false,
        Default::default(),
    );
    let replaced = block.with_lines(vec!["echo x".into(), "echo y".into()]);
    assert_eq!(replaced.content(), "echo x\necho y");
    assert_eq!(replaced.lines(), ["echo x", "echo y"]);
}
