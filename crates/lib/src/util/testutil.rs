//! Test utilities for svntest-lib.
//!
//! [`RecordingRunner`] answers every command through a closure, and
//! [`FakeServiceControl`] behaves like `sc` and `cacls` against an in-memory
//! service, so service management can be exercised on any platform.

use std::io;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::exec::{CommandOutput, CommandRunner};

type Responder = Box<dyn Fn(&str) -> io::Result<CommandOutput> + Send + Sync>;

/// A [`CommandRunner`] that records each command line and answers it with a closure.
pub struct RecordingRunner {
  calls: Mutex<Vec<String>>,
  responder: Responder,
}

impl RecordingRunner {
  pub fn new<F>(responder: F) -> Self
  where
    F: Fn(&str) -> io::Result<CommandOutput> + Send + Sync + 'static,
  {
    Self {
      calls: Mutex::new(Vec::new()),
      responder: Box::new(responder),
    }
  }

  /// Every command succeeds with empty output.
  pub fn succeeding() -> Self {
    Self::new(|_| Ok(CommandOutput::from_stdout("")))
  }

  /// Every command fails to spawn.
  pub fn unspawnable() -> Self {
    Self::new(|line| Err(io::Error::new(io::ErrorKind::NotFound, format!("not found: {}", line))))
  }

  /// Command lines run so far, as `<program> <arguments>`.
  pub fn calls(&self) -> Vec<String> {
    lock(&self.calls).clone()
  }
}

impl CommandRunner for RecordingRunner {
  async fn run(&self, program: &str, command_line: &str) -> io::Result<CommandOutput> {
    let line = format!("{} {}", program, command_line);
    lock(&self.calls).push(line.clone());
    (self.responder)(&line)
  }
}

#[derive(Debug, Default)]
struct ServiceState {
  installed: bool,
  running: bool,
  bin_path: Option<String>,
  calls: Vec<String>,
}

/// Simulates `sc` for a single service plus a `cacls` that always succeeds.
///
/// Failures are reported the way `sc` does: a `FAILED` line on stdout.
#[derive(Debug, Default)]
pub struct FakeServiceControl {
  state: Mutex<ServiceState>,
}

impl FakeServiceControl {
  pub fn new() -> Self {
    Self::default()
  }

  /// A service that is already registered but stopped.
  pub fn installed() -> Self {
    let fake = Self::default();
    lock(&fake.state).installed = true;
    fake
  }

  pub fn is_installed(&self) -> bool {
    lock(&self.state).installed
  }

  pub fn is_running(&self) -> bool {
    lock(&self.state).running
  }

  /// The `binPath=` argument of the last `sc create`.
  pub fn bin_path(&self) -> Option<String> {
    lock(&self.state).bin_path.clone()
  }

  pub fn calls(&self) -> Vec<String> {
    lock(&self.state).calls.clone()
  }

  /// Verbs passed to `sc`, in order.
  pub fn sc_verbs(&self) -> Vec<String> {
    self
      .calls()
      .iter()
      .filter_map(|line| line.strip_prefix("sc "))
      .filter_map(|rest| rest.split_whitespace().next())
      .map(str::to_string)
      .collect()
  }

  fn respond(state: &mut ServiceState, program: &str, command_line: &str) -> io::Result<CommandOutput> {
    if program == "cacls" {
      return Ok(CommandOutput::from_stdout("processed dir: \r\n"));
    }
    if program != "sc" {
      return Err(io::Error::new(io::ErrorKind::NotFound, program.to_string()));
    }

    let verb = command_line.split_whitespace().next().unwrap_or_default();
    let missing = concat!(
      "[SC] OpenService FAILED 1060:\r\n\r\n",
      "The specified service does not exist as an installed service.\r\n"
    );
    let stdout = match verb {
      "query" if state.installed => {
        if state.running {
          "SERVICE_NAME: test-svn-server\r\n        STATE              : 4  RUNNING\r\n"
        } else {
          "SERVICE_NAME: test-svn-server\r\n        STATE              : 1  STOPPED\r\n"
        }
      }
      "create" if state.installed => "[SC] CreateService FAILED 1073:\r\n\r\nThe specified service already exists.\r\n",
      "create" => {
        state.installed = true;
        state.bin_path = command_line
          .split_once("binPath= ")
          .and_then(|(_, rest)| rest.split_once(" DisplayName= "))
          .map(|(bin_path, _)| bin_path.to_string());
        "[SC] CreateService SUCCESS\r\n"
      }
      "start" if state.installed && state.running => {
        "[SC] StartService FAILED 1056:\r\n\r\nAn instance of the service is already running.\r\n"
      }
      "start" if state.installed => {
        state.running = true;
        "SERVICE_NAME: test-svn-server\r\n        STATE              : 2  START_PENDING\r\n"
      }
      "stop" if state.installed && state.running => {
        state.running = false;
        "SERVICE_NAME: test-svn-server\r\n        STATE              : 3  STOP_PENDING\r\n"
      }
      "stop" if state.installed => "[SC] ControlService FAILED 1062:\r\n\r\nThe service has not been started.\r\n",
      "delete" if state.installed => {
        state.installed = false;
        state.running = false;
        "[SC] DeleteService SUCCESS\r\n"
      }
      _ => missing,
    };
    Ok(CommandOutput::from_stdout(stdout))
  }
}

impl CommandRunner for FakeServiceControl {
  async fn run(&self, program: &str, command_line: &str) -> io::Result<CommandOutput> {
    let mut state = lock(&self.state);
    state.calls.push(format!("{} {}", program, command_line));
    Self::respond(&mut state, program, command_line)
  }
}

/// Create `dir` holding a small file for each name.
pub fn populate_dir(dir: &Path, names: &[&str]) -> io::Result<()> {
  std::fs::create_dir_all(dir)?;
  for name in names {
    std::fs::write(dir.join(name), name.as_bytes())?;
  }
  Ok(())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
  mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
