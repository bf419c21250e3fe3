//! Managing the svnserve Windows service.
//!
//! The service is registered under [`SERVICE_NAME`] with `sc` and runs a copy
//! of `svnserve.exe` out of a staging directory, together with the DLLs it
//! links against. Directory permissions are opened up with `cacls` so the
//! service account can read the repository.
//!
//! # Lifecycle
//!
//! ```ignore
//! let svnserve = Svnserve::new(config);
//! let session = svnserve.setup().await?;
//! // ... run tests against session.uri() ...
//! svnserve.teardown().await?;
//! session.release().await?;
//! ```

pub mod binaries;

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::SvnserveConfig;
use crate::consts::{REQUIRED_BINARIES, SERVICE_NAME, SERVICE_TYPE, STAGING_DIR_NAME, SVNSERVE_EXE};
use crate::error::{Result, SetupError};
use crate::exec::{CommandOutput, CommandRunner, ShellRunner};
use crate::platform::paths::{absolutize, to_windows_separators};

use self::binaries::{collect_binaries, path_dirs};

const SC: &str = "sc";
const CACLS: &str = "cacls";

/// Quote `value` for a command line, escaping embedded double quotes with a
/// backslash so the whole value stays one argument.
pub fn escape_value(value: &str) -> String {
  format!("\"{}\"", value.replace('"', "\\\""))
}

/// Render `key= "value"` pairs the way `sc` expects them.
pub fn format_service_args(args: &[(&str, &str)]) -> String {
  args
    .iter()
    .map(|(key, value)| format!("{}= {}", key, escape_value(value)))
    .collect::<Vec<_>>()
    .join(" ")
}

/// The svnserve service, driven through a [`CommandRunner`].
pub struct Svnserve<R = ShellRunner> {
  config: SvnserveConfig,
  runner: R,
  search_dirs: Option<Vec<PathBuf>>,
}

impl Svnserve<ShellRunner> {
  pub fn new(config: SvnserveConfig) -> Self {
    Self::with_runner(config, ShellRunner)
  }
}

impl<R: CommandRunner> Svnserve<R> {
  pub fn with_runner(config: SvnserveConfig, runner: R) -> Self {
    Self {
      config,
      runner,
      search_dirs: None,
    }
  }

  /// Look for the required binaries in `dirs` instead of the directories on `PATH`.
  pub fn with_search_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
    self.search_dirs = Some(dirs);
    self
  }

  pub fn config(&self) -> &SvnserveConfig {
    &self.config
  }

  pub fn runner(&self) -> &R {
    &self.runner
  }

  /// Absolute path of the directory the service binaries are copied into.
  pub fn staging_dir(&self) -> Result<PathBuf> {
    Ok(absolutize(&self.config.base_dir()?.join(STAGING_DIR_NAME))?)
  }

  /// Run `sc <command> test-svn-server <args>`.
  ///
  /// `sc` reports most failures on stdout with a zero exit code, so the only
  /// failure detected is the text `FAILED` in the output.
  pub async fn service_control(&self, command: &str, args: &[(&str, &str)]) -> Result<CommandOutput> {
    let args = format_service_args(args);
    let mut line = format!("{} {}", command, SERVICE_NAME);
    if !args.is_empty() {
      line.push(' ');
      line.push_str(&args);
    }

    info!(command = %command, service = SERVICE_NAME, "running service control");

    let output = self.runner.run(SC, &line).await.map_err(|source| SetupError::Spawn {
      program: SC.to_string(),
      source,
    })?;

    if output.combined().contains("FAILED") {
      return Err(SetupError::ServiceControl {
        command: command.to_string(),
        service: SERVICE_NAME.to_string(),
        args,
      });
    }

    Ok(output)
  }

  /// Whether the service is registered.
  ///
  /// Any failure of `sc query` counts as "not registered", including `sc`
  /// not being runnable at all. A broken service manager is therefore
  /// indistinguishable from a missing service.
  pub async fn service_exists(&self) -> bool {
    match self.service_control("query", &[]).await {
      Ok(_) => true,
      Err(err) => {
        debug!(error = %err, "service query failed, treating service as absent");
        false
      }
    }
  }

  /// Grant Everyone full access to `dir` and everything below it.
  ///
  /// The result is not checked; failures are only logged.
  pub async fn grant_everyone_full_access(&self, dir: &Path) {
    let dir = to_windows_separators(&dir.to_string_lossy());
    let line = format!("{} /T /E /P Everyone:F", escape_value(&dir));

    info!(dir = %dir, "granting Everyone full access");

    match self.runner.run(CACLS, &line).await {
      Ok(output) if !output.success() => {
        warn!(dir = %dir, code = ?output.code, "cacls did not succeed");
      }
      Ok(_) => {}
      Err(err) => warn!(dir = %dir, error = %err, "failed to run cacls"),
    }
  }

  /// The `binPath` registered for the service.
  pub fn bin_path(&self, staging_dir: &Path, repos_root: &Path, port: u16) -> String {
    let exe = to_windows_separators(&staging_dir.join(SVNSERVE_EXE).to_string_lossy());
    let root = to_windows_separators(&repos_root.to_string_lossy());
    let port = port.to_string();

    [
      escape_value(&exe).as_str(),
      "--service",
      "--root",
      escape_value(&root).as_str(),
      "--listen-host",
      self.config.host.as_str(),
      "--listen-port",
      port.as_str(),
    ]
    .join(" ")
  }

  /// Make sure the service is registered and (re)started.
  ///
  /// If the service does not exist yet, the required binaries are staged and
  /// the service is created; the returned session then carries a
  /// [`SvnserveCleanup`] that removes both again. An existing service is
  /// reused as-is and the session carries no cleanup.
  pub async fn setup(&self) -> Result<SvnserveSession<'_, R>> {
    let port = self.config.port()?;
    let uri = self.config.uri()?;
    let staging_dir = self.staging_dir()?;
    let repos_root = absolutize(&self.config.repos_path)?;

    self.grant_everyone_full_access(&repos_root).await;

    let mut cleanup = None;
    if !self.service_exists().await {
      let created_dir = !staging_dir.exists();
      std::fs::create_dir_all(&staging_dir).map_err(|source| SetupError::CreateDir {
        path: staging_dir.clone(),
        source,
      })?;
      if !created_dir {
        warn!(staging_dir = ?staging_dir, "staging directory already exists; it will be kept on cleanup");
      }

      let guard = SvnserveCleanup::new(self, staging_dir.clone(), created_dir);
      if let Err(err) = self.install(&staging_dir, &repos_root, port).await {
        release_after_failure(guard).await;
        return Err(err);
      }
      cleanup = Some(guard);
    }

    if let Err(err) = self.service_control("stop", &[]).await {
      debug!(error = %err, "service was not running");
    }

    if let Err(err) = self.service_control("start", &[]).await {
      if let Some(guard) = cleanup {
        release_after_failure(guard).await;
      }
      return Err(err);
    }

    info!(uri = %uri, "svnserve started");

    Ok(SvnserveSession { uri, port, cleanup })
  }

  async fn install(&self, staging_dir: &Path, repos_root: &Path, port: u16) -> Result<()> {
    let search_dirs = self.search_dirs.clone().unwrap_or_else(path_dirs);
    collect_binaries(&search_dirs, REQUIRED_BINARIES, staging_dir)?;

    self.grant_everyone_full_access(staging_dir).await;

    let bin_path = self.bin_path(staging_dir, repos_root, port);
    self
      .service_control(
        "create",
        &[("binPath", bin_path.as_str()), ("DisplayName", SERVICE_NAME), ("type", SERVICE_TYPE)],
      )
      .await?;

    info!(staging_dir = ?staging_dir, "registered svnserve service");
    Ok(())
  }

  /// Stop the service if it is registered.
  pub async fn teardown(&self) -> Result<()> {
    if self.service_exists().await {
      self.service_control("stop", &[]).await?;
    }
    Ok(())
  }

  /// Delete the service if it is registered and clear the staging directory.
  ///
  /// Only the staged binaries are deleted. The directory itself is removed
  /// once nothing else is left in it.
  pub async fn remove(&self) -> Result<()> {
    let staging_dir = self.staging_dir()?;
    self.remove_with_staging(&staging_dir, true).await
  }

  async fn remove_with_staging(&self, staging_dir: &Path, remove_dir: bool) -> Result<()> {
    let mut result = Ok(());

    if self.service_exists().await {
      if let Err(err) = self.service_control("delete", &[]).await {
        warn!(error = %err, "failed to delete service");
        result = Err(err);
      }
    }

    if let Err(err) = clear_staging_dir(staging_dir, remove_dir) {
      warn!(staging_dir = ?staging_dir, error = %err, "failed to clear staging directory");
      if result.is_ok() {
        result = Err(err);
      }
    }

    result
  }
}

/// Delete the staged binaries, then the directory if `remove_dir` is set and
/// nothing else is in it.
fn clear_staging_dir(staging_dir: &Path, remove_dir: bool) -> Result<()> {
  let remove_error = |path: &Path, source: std::io::Error| SetupError::Remove {
    path: path.to_path_buf(),
    source,
  };

  for name in REQUIRED_BINARIES {
    let path = staging_dir.join(name);
    match std::fs::remove_file(&path) {
      Ok(()) => debug!(path = ?path, "removed staged binary"),
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
      Err(source) => return Err(remove_error(&path, source)),
    }
  }

  if !remove_dir {
    return Ok(());
  }

  let mut entries = match std::fs::read_dir(staging_dir) {
    Ok(entries) => entries,
    Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
    Err(source) => return Err(remove_error(staging_dir, source)),
  };
  if entries.next().is_some() {
    info!(staging_dir = ?staging_dir, "staging directory holds other files, keeping it");
    return Ok(());
  }

  std::fs::remove_dir(staging_dir).map_err(|source| remove_error(staging_dir, source))?;
  info!(staging_dir = ?staging_dir, "removed staging directory");
  Ok(())
}

async fn release_after_failure<R: CommandRunner>(guard: SvnserveCleanup<'_, R>) {
  if let Err(err) = guard.release().await {
    warn!(error = %err, "cleanup after failed setup did not complete");
  }
}

/// A running svnserve as returned by [`Svnserve::setup`].
#[must_use = "release the session to remove a service it created"]
pub struct SvnserveSession<'a, R: CommandRunner> {
  uri: String,
  port: u16,
  cleanup: Option<SvnserveCleanup<'a, R>>,
}

impl<'a, R: CommandRunner> SvnserveSession<'a, R> {
  /// `svn://<host>:<port>` of the daemon.
  pub fn uri(&self) -> &str {
    &self.uri
  }

  pub fn port(&self) -> u16 {
    self.port
  }

  /// Whether this setup registered the service.
  pub fn created_service(&self) -> bool {
    self.cleanup.is_some()
  }

  pub fn into_cleanup(self) -> Option<SvnserveCleanup<'a, R>> {
    self.cleanup
  }

  /// Remove the service and staging directory if this setup created them.
  pub async fn release(self) -> Result<()> {
    match self.cleanup {
      Some(cleanup) => cleanup.release().await,
      None => Ok(()),
    }
  }

  /// Leave a created service registered after the session is dropped.
  pub fn persist(self) {
    if let Some(cleanup) = self.cleanup {
      cleanup.persist();
    }
  }
}

/// Deletes the service created by [`Svnserve::setup`] and the binaries it staged.
///
/// Cleanup needs to run commands, so it happens in [`release`](Self::release),
/// not on drop. Dropping an unreleased guard only logs a warning.
#[must_use = "call release() to delete the service"]
pub struct SvnserveCleanup<'a, R: CommandRunner> {
  svnserve: &'a Svnserve<R>,
  staging_dir: PathBuf,
  /// The staging directory did not exist before setup.
  created_dir: bool,
  armed: bool,
}

impl<'a, R: CommandRunner> SvnserveCleanup<'a, R> {
  fn new(svnserve: &'a Svnserve<R>, staging_dir: PathBuf, created_dir: bool) -> Self {
    Self {
      svnserve,
      staging_dir,
      created_dir,
      armed: true,
    }
  }

  pub fn staging_dir(&self) -> &Path {
    &self.staging_dir
  }

  /// Delete the service and the staged binaries. The staging directory is
  /// removed only if setup created it.
  pub async fn release(mut self) -> Result<()> {
    self.armed = false;
    self.svnserve.remove_with_staging(&self.staging_dir, self.created_dir).await
  }

  /// Disarm the guard and keep the service and staging directory.
  pub fn persist(mut self) -> PathBuf {
    self.armed = false;
    std::mem::take(&mut self.staging_dir)
  }
}

impl<R: CommandRunner> Drop for SvnserveCleanup<'_, R> {
  fn drop(&mut self) {
    if self.armed {
      warn!(
        service = SERVICE_NAME,
        staging_dir = ?self.staging_dir,
        "svnserve cleanup dropped without release; service left registered"
      );
    }
  }
}
