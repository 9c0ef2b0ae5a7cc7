//! In-process tests for the CLI runtime.

use std::ffi::OsString;
use std::fs;
use std::process::ExitCode;

use rstest::rstest;

use crate::run;

struct Captured {
    code: ExitCode,
    stdout: String,
    stderr: String,
}

fn invoke(args: &[&str]) -> Captured {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let argv = std::iter::once("refract")
        .chain(args.iter().copied())
        .map(OsString::from);
    let code = run(argv, &mut stdout, &mut stderr);
    Captured {
        code,
        stdout: String::from_utf8(stdout).expect("utf8 stdout"),
        stderr: String::from_utf8(stderr).expect("utf8 stderr"),
    }
}

#[rstest]
fn list_prints_the_whole_catalogue() {
    let captured = invoke(&["list"]);
    assert_eq!(captured.code, ExitCode::SUCCESS);
    assert_eq!(captured.stdout.lines().count(), 26);
    assert!(
        captured
            .stdout
            .lines()
            .next()
            .is_some_and(|line| line.starts_with("increment_to_assignment "))
    );
}

#[rstest]
fn list_filters_by_language() {
    let captured = invoke(&["list", "--language", "c"]);
    assert_eq!(captured.code, ExitCode::SUCCESS);
    assert!(!captured.stdout.contains("return_type_deduction"));
    assert!(captured.stdout.contains("for_to_while"));
}

#[rstest]
#[case("loop.c", "void f(int n) { while (n) n--; }", "void f(int n) { for (; n;) n--; }")]
#[case("loop.cpp", "void f(int n) { while (n > 0) --n; }", "void f(int n) { for (; n > 0;) --n; }")]
fn apply_rewrites_a_file(#[case] file: &str, #[case] source: &str, #[case] expected: &str) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(file);
    fs::write(&path, source).expect("write source");
    let path_text = path.to_str().expect("utf8 path");

    let captured = invoke(&["apply", "-t", "while_to_for", path_text]);

    assert_eq!(captured.code, ExitCode::SUCCESS, "{}", captured.stderr);
    assert_eq!(captured.stdout, expected);
}

#[rstest]
fn apply_reports_no_match() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("plain.cpp");
    fs::write(&path, "int f() { return 1; }").expect("write source");

    let captured = invoke(&[
        "apply",
        "-t",
        "while_to_for",
        path.to_str().expect("utf8 path"),
    ]);

    assert_eq!(captured.code, ExitCode::FAILURE);
    assert!(captured.stdout.is_empty());
    assert!(captured.stderr.contains("found no match"));
}

#[rstest]
fn apply_rejects_cpp_only_rules_for_c_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("plain.c");
    fs::write(&path, "int f(void) { return 1; }").expect("write source");

    let captured = invoke(&[
        "apply",
        "-t",
        "return_type_to_auto",
        path.to_str().expect("utf8 path"),
    ]);

    assert_eq!(captured.code, ExitCode::FAILURE);
    assert!(captured.stderr.contains("does not support c"));
}

#[rstest]
#[case(&["frobnicate"])]
#[case(&["apply"])]
#[case(&["run", "--jobs", "many"])]
fn usage_errors_exit_with_two(#[case] args: &[&str]) {
    let captured = invoke(args);
    assert_eq!(captured.code, ExitCode::from(2));
    assert!(!captured.stderr.is_empty());
}

#[rstest]
fn help_goes_to_stdout() {
    let captured = invoke(&["--help"]);
    assert_eq!(captured.code, ExitCode::SUCCESS);
    assert!(captured.stdout.contains("Usage: refract"));
}

#[rstest]
fn apply_rejects_an_unrecognised_extension() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("loop.txt");
    fs::write(&path, "void f(int n) { while (n) n--; }").expect("write source");
    let path_text = path.to_str().expect("utf8 path");

    let captured = invoke(&["apply", "-t", "while_to_for", path_text]);
    assert_eq!(captured.code, ExitCode::FAILURE);
    assert!(captured.stdout.is_empty());
    assert!(
        captured.stderr.contains("could not determine language"),
        "{}",
        captured.stderr
    );

    let explicit = invoke(&["apply", "-t", "while_to_for", "--language", "c", path_text]);
    assert_eq!(explicit.code, ExitCode::SUCCESS, "{}", explicit.stderr);
    assert_eq!(explicit.stdout, "void f(int n) { for (; n;) n--; }");
}
