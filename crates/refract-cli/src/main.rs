//! CLI entrypoint for the refract transformation engine.
//!
//! The binary delegates to [`refract_cli::run`], which parses arguments,
//! loads configuration and dispatches to the `run`, `apply` and `list`
//! commands.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    refract_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
