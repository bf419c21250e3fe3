//! Implementation of the svnserve service commands.
//!
//! `start` leaves the service registered for later test runs, `serve` keeps it
//! up until Ctrl-C and then removes what it created.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{info, warn};

use svntest_lib::consts::SERVICE_NAME;
use svntest_lib::platform::is_elevated;
use svntest_lib::{Svnserve, SvnserveConfig};

/// Where svnserve runs and what it serves.
#[derive(Args, Debug, Clone, Default)]
pub struct ServiceArgs {
  /// JSON settings file; flags override its fields
  #[arg(short, long)]
  pub config: Option<PathBuf>,

  /// Repository root to serve
  #[arg(long)]
  pub repos: Option<PathBuf>,

  /// Directory the svnserve staging directory is created in (required by start, serve and remove)
  #[arg(long)]
  pub base_dir: Option<PathBuf>,

  /// Host svnserve listens on
  #[arg(long)]
  pub host: Option<String>,

  /// Candidate port (repeatable; the first one is used)
  #[arg(long = "port")]
  pub ports: Vec<u16>,
}

impl ServiceArgs {
  /// Settings from `--config` (or the defaults) with flags applied on top.
  pub fn to_config(&self) -> Result<SvnserveConfig> {
    let mut config = match &self.config {
      Some(path) => SvnserveConfig::from_file(path).with_context(|| format!("Failed to load {}", path.display()))?,
      None => SvnserveConfig::default(),
    };

    if let Some(repos) = &self.repos {
      config.repos_path = repos.clone();
    }
    if let Some(base_dir) = &self.base_dir {
      config.base_dir = Some(base_dir.clone());
    }
    if let Some(host) = &self.host {
      config.host = host.clone();
    }
    if !self.ports.is_empty() {
      config.ports = self.ports.clone();
    }

    Ok(config)
  }

  /// Like [`to_config`](Self::to_config), for commands that stage binaries.
  fn to_staging_config(&self) -> Result<SvnserveConfig> {
    let config = self.to_config()?;
    if config.base_dir.is_none() {
      bail!("--base-dir is required (or `base_dir` in the --config file)");
    }
    Ok(config)
  }
}

fn warn_if_not_elevated() {
  if !is_elevated() {
    warn!("not running elevated; sc create/delete will likely fail");
  }
}

/// Execute the start command.
pub async fn cmd_start(args: &ServiceArgs) -> Result<()> {
  warn_if_not_elevated();

  let svnserve = Svnserve::new(args.to_staging_config()?);
  let session = svnserve.setup().await.context("Failed to start svnserve")?;

  let created = session.created_service();
  let uri = session.uri().to_string();
  session.persist();

  if created {
    println!("{} {} at {}", "Registered".green().bold(), SERVICE_NAME, uri);
  } else {
    println!("{} {} at {}", "Restarted".green().bold(), SERVICE_NAME, uri);
  }

  Ok(())
}

/// Execute the serve command.
///
/// Stops the service on Ctrl-C and deletes it if this run registered it.
pub async fn cmd_serve(args: &ServiceArgs) -> Result<()> {
  warn_if_not_elevated();

  let svnserve = Svnserve::new(args.to_staging_config()?);
  let session = svnserve.setup().await.context("Failed to start svnserve")?;

  println!("{} {} at {}", "Serving".green().bold(), SERVICE_NAME, session.uri());
  println!("Press Ctrl-C to stop");

  tokio::signal::ctrl_c().await.context("Failed to wait for Ctrl-C")?;
  info!("shutting down svnserve");

  if let Err(err) = svnserve.teardown().await {
    warn!(error = %err, "failed to stop service");
  }
  session.release().await.context("Failed to remove svnserve")?;

  println!("{} {}", "Stopped".yellow().bold(), SERVICE_NAME);
  Ok(())
}

/// Execute the stop command.
pub async fn cmd_stop(args: &ServiceArgs) -> Result<()> {
  let svnserve = Svnserve::new(args.to_config()?);
  svnserve.teardown().await.context("Failed to stop svnserve")?;

  println!("{} {}", "Stopped".yellow().bold(), SERVICE_NAME);
  Ok(())
}

/// Execute the remove command.
pub async fn cmd_remove(args: &ServiceArgs) -> Result<()> {
  warn_if_not_elevated();

  let svnserve = Svnserve::new(args.to_staging_config()?);
  svnserve.remove().await.context("Failed to remove svnserve")?;

  println!("{} {}", "Removed".red().bold(), SERVICE_NAME);
  Ok(())
}

/// Execute the status command.
pub async fn cmd_status(args: &ServiceArgs) -> Result<()> {
  let svnserve = Svnserve::new(args.to_config()?);

  if svnserve.service_exists().await {
    println!("{}: {}", SERVICE_NAME, "registered".green());
  } else {
    println!("{}: {}", SERVICE_NAME, "not registered".dimmed());
  }

  Ok(())
}
