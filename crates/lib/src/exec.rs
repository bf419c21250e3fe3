//! Running external tools.
//!
//! Service management talks to the OS only through `sc` and `cacls`. Both are
//! invoked with a prebuilt command line through the platform shell, so the
//! quoting produced by [`crate::service::escape_value`] reaches the tool as
//! written. [`CommandRunner`] is the seam tests replace with
//! [`crate::util::testutil::RecordingRunner`].

use std::io;

use tokio::process::Command;
use tracing::{debug, warn};

/// Exit code the platform shell uses when it cannot find the program.
#[cfg(windows)]
const SHELL_NOT_FOUND: i32 = 9009;
#[cfg(not(windows))]
const SHELL_NOT_FOUND: i32 = 127;

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
  /// Exit code, if the process exited normally.
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl CommandOutput {
  /// Output with the given stdout and a zero exit code.
  pub fn from_stdout(stdout: &str) -> Self {
    Self {
      code: Some(0),
      stdout: stdout.to_string(),
      stderr: String::new(),
    }
  }

  /// Stdout followed by stderr.
  pub fn combined(&self) -> String {
    format!("{}{}", self.stdout, self.stderr)
  }

  pub fn success(&self) -> bool {
    self.code == Some(0)
  }
}

/// Runs `program` with an already-quoted argument string and waits for it.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
  async fn run(&self, program: &str, command_line: &str) -> io::Result<CommandOutput>;
}

/// Runs commands through `cmd.exe /C` on Windows and `/bin/sh -c` elsewhere.
///
/// A program the shell cannot find is reported as an [`io::ErrorKind::NotFound`]
/// error, the same as a program that cannot be spawned directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
  async fn run(&self, program: &str, command_line: &str) -> io::Result<CommandOutput> {
    let line = if command_line.is_empty() {
      program.to_string()
    } else {
      format!("{} {}", program, command_line)
    };

    debug!(command = %line, "spawning process");

    let output = shell_command(&line).output().await?;
    let result = CommandOutput {
      code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if !result.stdout.is_empty() {
      debug!(stdout = %result.stdout.trim_end(), "command stdout");
    }
    if !result.stderr.is_empty() {
      debug!(stderr = %result.stderr.trim_end(), "command stderr");
    }

    if result.code == Some(SHELL_NOT_FOUND) {
      warn!(program = %program, "shell could not find program");
      return Err(io::Error::new(
        io::ErrorKind::NotFound,
        format!("{}: {}", program, result.combined().trim_end()),
      ));
    }

    Ok(result)
  }
}

#[cfg(windows)]
fn shell_command(line: &str) -> Command {
  let mut command = Command::new("cmd.exe");
  command.arg("/C").raw_arg(line);
  command
}

#[cfg(not(windows))]
fn shell_command(line: &str) -> Command {
  let mut command = Command::new("/bin/sh");
  command.arg("-c").arg(line);
  command
}
