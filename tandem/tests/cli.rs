use std::io::{Read, Write};
use std::process::{Command, Output, Stdio};

fn tandem() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tandem"))
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_owned)
        .collect()
}

#[test]
fn test_prints_four_markers_and_returns_on_end_of_input() {
    let output = tandem()
        .args(["--time-unit-ms", "10"])
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert!(output.status.success(), "exit status {:?}", output.status);
    assert_eq!(
        stdout_lines(&output),
        [
            "TaskAsync Started",
            "TaskAsync2 Started",
            "TaskAsync2 Finished",
            "TaskAsync Finished",
        ]
    );
}

#[test]
fn test_key_press_ends_the_wait() {
    let mut child = tandem()
        .args(["--time-unit-ms", "10"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(b"x").unwrap();

    // Keep stdin open: only the byte may end the wait.
    let output = child.wait_with_output().unwrap();
    drop(stdin);

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output).len(), 4);
}

#[test]
fn test_no_wait_exits_with_stdin_still_open() {
    let mut child = tandem()
        .args(["--time-unit-ms", "10", "--no-wait"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    let stdin = child.stdin.take();
    let output = child.wait_with_output().unwrap();
    drop(stdin);

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output).len(), 4);
}

#[test]
fn test_unknown_flag_is_a_usage_error() {
    let output = tandem().arg("--bogus").stdin(Stdio::null()).output().unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown flag `--bogus`"), "stderr: {stderr}");
    assert!(stderr.contains("Usage: tandem"));
}

#[test]
fn test_malformed_value_is_a_usage_error() {
    let output = tandem()
        .args(["--time-unit-ms", "0"])
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_help_exits_cleanly() {
    let output = tandem().arg("--help").stdin(Stdio::null()).output().unwrap();

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--time-unit-ms"));
}

#[test]
fn test_failed_unit_exits_with_failure() {
    let mut child = tandem()
        .args(["--time-unit-ms", "50", "--no-wait"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    // Finish markers come 250ms in, long after the read end is gone.
    drop(child.stdout.take());

    let status = child.wait().unwrap();

    let mut stderr = String::new();
    child
        .stderr
        .take()
        .unwrap()
        .read_to_string(&mut stderr)
        .unwrap();

    assert_eq!(status.code(), Some(1));
    assert!(stderr.contains("error: "), "stderr: {stderr}");
}
