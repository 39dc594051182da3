use assert_cmd::Command;
use predicates::prelude::*;

const README: &str = r#"# Demo

```sh {name=greet}
echo hello from runme
```

```sh {name=fails}
exit 7
```

```sh {name=shout}
echo quiet
```
"#;

fn write_readme(dir: &tempfile::TempDir) {
    std::fs::write(dir.path().join("README.md"), README).expect("write README");
}

#[test]
fn list_shows_parsed_blocks() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_readme(&dir);

    Command::cargo_bin("runme")
        .expect("binary")
        .args(["--chdir", dir.path().to_str().expect("utf8"), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("greet"))
        .stdout(predicate::str::contains("fails"));
}

#[test]
fn list_json_is_machine_readable() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_readme(&dir);

    let output = Command::cargo_bin("runme")
        .expect("binary")
        .args(["--chdir", dir.path().to_str().expect("utf8"), "list", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let names: Vec<&str> = parsed
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|b| b["name"].as_str())
        .collect();
    assert_eq!(names, ["greet", "fails", "shout"]);
}

#[test]
fn run_executes_the_named_block() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_readme(&dir);

    Command::cargo_bin("runme")
        .expect("binary")
        .args(["--chdir", dir.path().to_str().expect("utf8"), "run", "greet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello from runme"));
}

#[test]
fn run_forwards_the_block_exit_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_readme(&dir);

    Command::cargo_bin("runme")
        .expect("binary")
        .args(["--chdir", dir.path().to_str().expect("utf8"), "run", "fails"])
        .assert()
        .code(7);
}

#[test]
fn dry_run_prints_without_executing() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_readme(&dir);

    Command::cargo_bin("runme")
        .expect("binary")
        .args([
            "--chdir",
            dir.path().to_str().expect("utf8"),
            "run",
            "greet",
            "--dry-run",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("echo hello from runme"))
        .stdout(predicate::str::contains("hello from runme").not());
}

#[test]
fn replace_rewrites_lines_before_running() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_readme(&dir);

    Command::cargo_bin("runme")
        .expect("binary")
        .args([
            "--chdir",
            dir.path().to_str().expect("utf8"),
            "run",
            "shout",
            "-r",
            "s/quiet/LOUD/",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("LOUD"));
}

#[test]
fn unknown_block_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_readme(&dir);

    Command::cargo_bin("runme")
        .expect("binary")
        .args(["--chdir", dir.path().to_str().expect("utf8"), "run", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}
