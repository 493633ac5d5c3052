//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Path of the py3graph binary built for this test run
pub fn py3graph_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_py3graph"))
}

/// Run py3graph in `dir`, feeding `stdin` to it
pub fn run_py3graph_with_stdin(dir: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(py3graph_binary())
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn py3graph binary");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");

    child
        .wait_with_output()
        .expect("Failed to wait for py3graph binary")
}

/// Run py3graph in `dir` with empty stdin
pub fn run_py3graph_in_dir(dir: &Path, args: &[&str]) -> Output {
    run_py3graph_with_stdin(dir, args, "")
}

/// Package records for a small zope-like world:
///
/// - `zope.app` requires `zope.lib`, and `zope.testing` for its `test` extra
/// - `zope.lib` requires `zope.base`
/// - only `zope.base` and `zope.testing` claim Python 3 support
pub fn sample_records() -> &'static str {
    r#"[
  {"name": "zope.app", "requires": ["zope.lib"],
   "requires_extras": {"test": ["zope.testing"]}, "supports": ["2.7"]},
  {"name": "zope.lib", "requires": ["zope.base"], "supports": ["2.6", "2.7"]},
  {"name": "zope.base", "requires": [], "supports": ["2.7", "3.3"]},
  {"name": "zope.testing", "supports": ["3.4"]}
]"#
}

/// stdout of a finished run, asserting it succeeded
pub fn success_stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "py3graph failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}
