//! Shared test helpers for workspace crates.

use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

/// Run `bin` with `args`, capturing its output.
pub fn run(bin: impl AsRef<Path>, args: &[&str]) -> Output {
	Command::new(bin.as_ref()).args(args).output().expect("command executes")
}

/// Run `bin` and parse its stdout as JSON; the command must succeed.
pub fn run_json(bin: impl AsRef<Path>, args: &[&str]) -> Value {
	let output = run(bin, args);
	assert!(
		output.status.success(),
		"command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

/// Run `bin` and return its stderr; the command must fail with exit code 1.
pub fn run_failure(bin: impl AsRef<Path>, args: &[&str]) -> String {
	let output = run(bin, args);
	assert_eq!(output.status.code(), Some(1), "command should exit with 1");
	String::from_utf8_lossy(&output.stderr).into_owned()
}
