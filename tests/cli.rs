//! CLI tests: run the `arco` binary against a copy of `fixtures/site/`.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

fn copy_dir_recursive(src: &Path, dst: &Path) {
    for entry in fs::read_dir(src).unwrap() {
        let entry = entry.unwrap();
        let target = dst.join(entry.file_name());
        if entry.path().is_dir() {
            fs::create_dir_all(&target).unwrap();
            copy_dir_recursive(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
}

fn fixture_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path());
    tmp
}

fn arco(project: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_arco"))
        .arg("--project")
        .arg(project)
        .args(args)
        .env_remove("ARCO_LOG")
        .output()
        .expect("failed to run arco")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[test]
fn generate_builds_fixture_site() {
    let tmp = fixture_project();
    let output = arco(tmp.path(), &["generate"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let out = tmp.path().join("output");
    for path in [
        "index.html",
        "tech/hello-rust.html",
        "tech/toolchain.html",
        "life/notes.html",
        "static/style.css",
    ] {
        assert!(out.join(path).is_file(), "missing {path}");
    }

    let hello = fs::read_to_string(out.join("tech/hello-rust.html")).unwrap();
    assert!(hello.contains("<title>Hello Rust</title>"));
    assert!(hello.contains("<link rel=\"canonical\" href=\"https://notes.example.org\">"));
    assert!(hello.contains("<div class=\"toc\">"));
    assert!(hello.contains("<div class=\"codehilite\">"));
    assert!(hello.contains("&copy; 2024 Ada Lovelace"));

    let summary = stdout(&output);
    assert!(summary.contains("Home \u{2192} index.html"));
    assert!(summary.contains("Generated 3 pages in 2 tags \u{2192} output"));
}

#[test]
fn generate_alias() {
    let tmp = fixture_project();
    let output = arco(tmp.path(), &["g"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(tmp.path().join("output/index.html").is_file());
}

#[test]
fn new_writes_header() {
    let tmp = fixture_project();
    let output = arco(
        tmp.path(),
        &["new", "-t", "Hello", "-g", "demo", "-f", "hello.md"],
    );
    assert!(output.status.success(), "{}", stderr(&output));

    let text = fs::read_to_string(tmp.path().join("md/hello.md")).unwrap();
    let lines: Vec<&str> = text.lines().take(2).collect();
    assert_eq!(lines, vec!["Title: Hello", "Tag: demo"]);
    assert!(stdout(&output).starts_with("Created md/hello.md\n"));
}

#[test]
fn new_refuses_existing_file_without_force() {
    let tmp = fixture_project();
    let args = ["n", "-t", "Again", "-g", "tech", "-f", "toolchain.md"];

    let output = arco(tmp.path(), &args);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("toolchain.md"), "{}", stderr(&output));

    let mut forced = args.to_vec();
    forced.push("--force");
    let output = arco(tmp.path(), &forced);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = fs::read_to_string(tmp.path().join("md/toolchain.md")).unwrap();
    assert!(text.starts_with("Title: Again\n"));
}

#[test]
fn malformed_content_exits_non_zero() {
    let tmp = fixture_project();
    fs::write(tmp.path().join("md/broken.md"), "only one line").unwrap();

    let output = arco(tmp.path(), &["generate"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("broken.md"), "{}", stderr(&output));
    assert!(!tmp.path().join("output").exists());
}

#[test]
fn missing_config_exits_non_zero() {
    let tmp = TempDir::new().unwrap();
    let output = arco(tmp.path(), &["generate"]);
    assert!(!output.status.success());
    let dir = tmp.path().file_name().unwrap().to_string_lossy();
    assert!(stderr(&output).contains(&*dir), "{}", stderr(&output));
}

#[test]
fn deploy_without_repo_exits_non_zero() {
    let tmp = fixture_project();
    let output = arco(tmp.path(), &["deploy"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("repo"), "{}", stderr(&output));
}

#[test]
fn gen_config_output_is_a_valid_config() {
    let tmp = TempDir::new().unwrap();
    let output = arco(tmp.path(), &["gen-config"]);
    assert!(output.status.success());

    fs::write(tmp.path().join("config.toml"), stdout(&output)).unwrap();
    fs::create_dir_all(tmp.path().join("md")).unwrap();
    let check = arco(tmp.path(), &["new", "-t", "T", "-g", "g", "-f", "t.md"]);
    assert!(check.status.success(), "{}", stderr(&check));
}
