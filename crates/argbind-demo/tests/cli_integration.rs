use std::process::{Command, Output};

fn demo() -> Command {
    Command::new(env!("CARGO_BIN_EXE_argbind-demo"))
}

fn run(args: &[&str]) -> Output {
    demo()
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run argbind-demo")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn help_option_exits_successfully() {
    let out = run(&["sum", "--help"]);
    assert!(
        out.status.success(),
        "sum --help failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        stderr(&out),
    );
    let err = stderr(&out);
    assert!(
        err.contains("Usage:") && err.contains("argbind-demo sum [--int <INTEGER>] numbers..."),
        "unexpected help output:\n{err}"
    );
    assert!(stdout(&out).is_empty());
}

#[test]
fn unknown_option_prints_the_error_and_usage() {
    let out = run(&["sum", "--bogus"]);
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(
        err.starts_with("Unknown option --bogus\n\nUsage:\n"),
        "unexpected stderr:\n{err}"
    );
}

#[test]
fn default_command_runs_without_a_key() {
    let out = run(&[]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));
    assert_eq!(stdout(&out), "Hello, world!\n");
}

#[test]
fn default_command_by_name() {
    let out = run(&["greet", "--name", "argbind", "-l"]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));
    assert_eq!(stdout(&out), "HELLO, ARGBIND!\n");
}

#[test]
fn nested_commands_dispatch() {
    let out = run(&["test", "add"]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));
    assert_eq!(stdout(&out), "test add called\n");

    let out = run(&["test", "run"]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));
    assert_eq!(stdout(&out), "test run called\n");
}

#[test]
fn sum_reads_options_and_free_arguments() {
    let out = run(&["sum", "-i", "1", "--int", "2", "--", "-3", "10"]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));
    assert_eq!(stdout(&out), "Integers sum = 10\n");
}

#[test]
fn required_option_is_enforced() {
    let out = run(&["run"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).starts_with("Option executable is required.\n"));

    let out = run(&["run", "-e", "/bin/true"]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));
    assert_eq!(stdout(&out), "Executable: /bin/true\n");
}

#[test]
fn unknown_command_exits_with_failure() {
    let out = run(&["status"]);
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(
        err.starts_with("Unknown command status\n") && err.contains("Commands:"),
        "unexpected stderr:\n{err}"
    );
}

#[test]
fn nested_dispatcher_requires_a_command() {
    let out = run(&["test"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).starts_with("Command is not specified\n"));
}
