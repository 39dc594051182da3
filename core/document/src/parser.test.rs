use pretty_assertions::assert_eq;

use super::*;

const SOURCE: &str = r#"# Demo

Some prose.

```sh {name=greet}
echo hello
echo world
```

```go
package main

func main() {}
```

```
untagged
```
"#;

#[test]
fn extracts_blocks_in_order() {
    let blocks = extract_blocks(SOURCE);
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0].name(), "greet");
    assert_eq!(blocks[0].language(), "sh");
    assert_eq!(blocks[0].lines(), ["echo hello", "echo world"]);
    assert_eq!(blocks[1].language(), "go");
    assert!(blocks[1].content().contains("package main"));
    assert_eq!(blocks[2].language(), "");
}

#[test]
fn derives_and_dedupes_names() {
    let source = "```sh\necho one\n```\n\n```sh\necho two\n```\n";
    let blocks = extract_blocks(source);
    assert_eq!(blocks[0].name(), "echo");
    assert_eq!(blocks[1].name(), "echo-2");
}

#[test]
fn interactive_attribute_is_parsed() {
    let source = "```sh {name=top interactive=true}\ntop\n```\n";
    let blocks = extract_blocks(source);
    assert!(blocks[0].interactive());
}

#[test]
fn indented_code_is_ignored() {
    let source = "text\n\n    indented code\n\nmore\n";
    assert!(extract_blocks(source).is_empty());
}

#[test]
fn document_lookup_finds_named_block() {
    let doc = crate::Document::parse(SOURCE).expect("parse");
    assert_eq!(doc.lookup("greet").expect("greet").language(), "sh");
    assert!(doc.lookup("missing").is_err());
}

#[test]
fn frontmatter_shell_reaches_document() {
    let source = "---\nshell: /bin/bash\n---\n\n```sh\necho hi\n```\n";
    let doc = crate::Document::parse(source).expect("parse");
    assert_eq!(doc.frontmatter.shell.as_deref(), Some("/bin/bash"));
    assert_eq!(doc.blocks.len(), 1);
}
