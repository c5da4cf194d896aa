//! Tests for the `function-info` command-line driver.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::tempdir;

const MODULE_IR: &str = r#"
declare i32 @puts(ptr)

define i32 @max(i32 %a, i32 %b) {
entry:
  %cmp = icmp sgt i32 %a, %b
  br i1 %cmp, label %then, label %else
then:
  ret i32 %a
else:
  ret i32 %b
}

define void @greet(ptr %msg) {
entry:
  %r = call i32 @puts(ptr %msg)
  %r2 = call i32 @puts(ptr %msg)
  ret void
}

define i32 @count_up(i32 %n) {
entry:
  br label %body
body:
  %i = phi i32 [ 0, %entry ], [ %next, %body ]
  %next = add i32 %i, 1
  %done = icmp eq i32 %next, %n
  br i1 %done, label %exit, label %body
exit:
  ret i32 %next
}
"#;

const OTHER_IR: &str = r#"
define void @other() {
entry:
  ret void
}
"#;

const TEXT_REPORT: &str = "\nFunction name is max\
                           \nThe number of arguments in this function are 2\
                           \nThe number of basic blocks in this function are 3\
                           \nThe number of instructions in this function are 4\
                           \nFunction name is greet\
                           \nThe number of arguments in this function are 1\
                           \nThe number of basic blocks in this function are 1\
                           \nThe number of instructions in this function are 3\
                           \nFunction name is count_up\
                           \nThe number of arguments in this function are 1\
                           \nThe number of basic blocks in this function are 3\
                           \nThe number of instructions in this function are 6\n";

fn function_info() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_function-info"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_module(dir: &Path, name: &str, ir: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, ir).unwrap();
    path
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn test_text_report_on_stderr() {
    let dir = tempdir().unwrap();
    let path = write_module(dir.path(), "text.ll", MODULE_IR);
    let output = function_info().arg(&path).output().unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stderr(&output), format!("CSE521 Function Information Pass\n{}", TEXT_REPORT));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_csv_report_on_stdout() {
    let dir = tempdir().unwrap();
    let path = write_module(dir.path(), "csv.ll", MODULE_IR);
    let output = function_info()
        .args(["-o", "stdout", "--format", "csv"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "Name,\tArgs,\tCalls,\tBlocks,\tInsns\n\
         max,\t2,\t0,\t3,\t4\n\
         greet,\t1,\t2,\t1,\t3\n\
         count_up,\t1,\t0,\t3,\t6\n"
    );
    assert!(output.stderr.is_empty());
}

#[test]
fn test_reads_module_from_stdin() {
    let mut child = function_info()
        .args(["-o", "stdout", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(MODULE_IR.as_bytes()).unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), format!("CSE521 Function Information Pass\n{}", TEXT_REPORT));
}

#[test]
fn test_stats_totals() {
    let dir = tempdir().unwrap();
    let path = write_module(dir.path(), "stats.ll", MODULE_IR);
    let output = function_info()
        .args(["-o", "stdout", "--stats"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    let expected_stats = "Session Statistics:\n\
                          \x20 Functions visited: 3\n\
                          \x20 Declarations skipped: 1\n\
                          \x20 Arguments: 4\n\
                          \x20 Calls: 2\n\
                          \x20 Basic blocks: 7\n\
                          \x20 Instructions: 13\n";
    assert!(stdout(&output).ends_with(&format!("{}{}", TEXT_REPORT, expected_stats)));
}

#[test]
fn test_banner_tag_option() {
    let dir = tempdir().unwrap();
    let path = write_module(dir.path(), "banner.ll", MODULE_IR);

    let output = function_info().args(["--banner-tag", ""]).arg(&path).output().unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stderr(&output).starts_with("Function Information Pass\n\nFunction name is max"));

    let output = function_info().args(["--banner-tag", "CS101"]).arg(&path).output().unwrap();
    assert!(stderr(&output).starts_with("CS101 Function Information Pass\n"));
}

#[test]
fn test_list_passes() {
    let output = function_info().arg("--list-passes").output().unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    let listing = stdout(&output);
    let line = listing.lines().find(|line| line.contains("-function-info")).unwrap();
    assert!(line.ends_with("- CSE521: Function Information"), "{}", line);
}

#[test]
fn test_function_filter_across_inputs() {
    let dir = tempdir().unwrap();
    let first = write_module(dir.path(), "filter-a.ll", MODULE_IR);
    let second = write_module(dir.path(), "filter-b.ll", OTHER_IR);

    let output = function_info()
        .args(["-o", "stdout", "--format", "csv", "--function", "greet"])
        .arg(&first)
        .arg(&second)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "Name,\tArgs,\tCalls,\tBlocks,\tInsns\ngreet,\t1,\t2,\t1,\t3\n");

    let output = function_info()
        .args(["-o", "stdout", "--format", "csv", "--function", "other"])
        .arg(&first)
        .arg(&second)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "Name,\tArgs,\tCalls,\tBlocks,\tInsns\nother,\t0,\t0,\t1,\t1\n");
}

#[test]
fn test_unknown_function_fails() {
    let dir = tempdir().unwrap();
    let path = write_module(dir.path(), "nope.ll", MODULE_IR);
    let output = function_info().args(["--function", "nope"]).arg(&path).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Error: Function not found: nope"), "{}", err);
    assert!(!err.contains("Function Information Pass"), "{}", err);
}

#[test]
fn test_missing_file_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.ll");
    let output = function_info().arg(&path).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error: Failed to load module"), "{}", stderr(&output));
}

#[test]
fn test_unknown_pass_fails() {
    let dir = tempdir().unwrap();
    let path = write_module(dir.path(), "dce.ll", MODULE_IR);
    let output = function_info().args(["-p", "dce"]).arg(&path).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error: Unknown pass: dce"), "{}", stderr(&output));
}
