//! Exit codes of the `squid` binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn squid(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_squid"))
        .current_dir(cwd)
        .env("NO_COLOR", "1")
        .env_remove("SQUID_LOG_FILE")
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn failing_files_still_exit_zero() {
    let dir = tempdir().unwrap();
    let docs = dir.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    fs::write(docs.join("good.md"), "# Good\n").unwrap();
    fs::write(docs.join("logo.txt"), "logo").unwrap();
    fs::write(docs.join("broken.md"), [0xc3u8, 0x28, 0xff]).unwrap();

    let out = squid(dir.path(), &["--no-color", "docs", "-o", "site"]);

    assert_eq!(out.status.code(), Some(0));
    assert!(dir.path().join("site/docs/good.html").is_file());
    assert!(dir.path().join("site/docs/logo.txt").is_file());
    assert!(!dir.path().join("site/docs/broken.html").exists());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("broken.md"), "{}", stderr);
}

#[test]
fn default_destination_is_build() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("docs/a.md"), "a").unwrap();

    let out = squid(dir.path(), &["-q", "docs"]);

    assert_eq!(out.status.code(), Some(0));
    assert!(dir.path().join("build/docs/a.html").is_file());
}

#[test]
fn missing_source_exits_one() {
    let dir = tempdir().unwrap();
    let out = squid(dir.path(), &["--no-color", "nowhere"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(!dir.path().join("build").exists());
}

#[test]
fn non_markdown_source_exits_one() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), "plain").unwrap();
    let out = squid(dir.path(), &["--no-color", "notes.txt"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn usage_errors_exit_one() {
    let dir = tempdir().unwrap();
    assert_eq!(squid(dir.path(), &[]).status.code(), Some(1));
    assert_eq!(squid(dir.path(), &["--bogus", "docs"]).status.code(), Some(1));
    assert_eq!(squid(dir.path(), &["docs", "public", "-o", "site"]).status.code(), Some(1));
}

#[test]
fn help_and_version_exit_zero() {
    let dir = tempdir().unwrap();
    let help = squid(dir.path(), &["--help"]);
    assert_eq!(help.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&help.stdout).contains("markdown"));
    assert_eq!(squid(dir.path(), &["--version"]).status.code(), Some(0));
}
