use std::{
    io::Write,
    process::{Command, Output, Stdio},
};

fn run(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tilemerge"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to launch tilemerge");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("failed to write stdin");
    child.wait_with_output().expect("tilemerge exits")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf-8 output")
}

fn exported_session(output: &Output) -> String {
    stdout(output)
        .lines()
        .rev()
        .find(|line| line.starts_with("tilemerge:v1:4x4:"))
        .expect("session string printed")
        .to_owned()
}

#[test]
fn scripted_run_is_reproducible_for_a_seed() {
    let args = ["--seed", "2048", "--moves", "lurdlurd", "--export"];

    let first = run(&args, "");
    let second = run(&args, "");

    assert!(first.status.success());
    assert_eq!(stdout(&first), stdout(&second));
    assert!(stdout(&first).contains("score "));
}

#[test]
fn exported_session_resumes_where_it_stopped() {
    let played = run(&["--seed", "9", "--moves", "ldrul", "--export"], "");
    let session = exported_session(&played);

    let resumed = run(&["--resume", &session, "--export"], "");

    assert!(resumed.status.success());
    assert_eq!(exported_session(&resumed), session);
}

#[test]
fn stdin_commands_are_played_until_quit() {
    let output = run(&["--seed", "1"], "left\nbogus\nq\nright\n");
    let text = stdout(&output);

    assert!(output.status.success());
    assert!(text.contains("unrecognised input 'bogus'"));
    assert_eq!(text.lines().last(), Some("bye"), "input after quit was played");
}

#[test]
fn refused_reset_is_reported() {
    let output = run(
        &["--seed", "3", "--reset-policy", "when-finished", "--moves", "n"],
        "",
    );
    assert!(stdout(&output).contains("finish the current game before starting another"));
}

#[test]
fn malformed_session_string_fails() {
    let output = run(&["--resume", "puzzle:v1:4x4:e30"], "");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read --resume session"), "{stderr}");
}
