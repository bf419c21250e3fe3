mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use svntest_lib::consts::{DEFAULT_BUILD_TYPE, PROP_REVISION_LOG};

use crate::cmd::{ServiceArgs, cmd_env, cmd_hook, cmd_paths, cmd_remove, cmd_serve, cmd_start, cmd_status, cmd_stop};

/// svntest - Windows test-support tooling for the Subversion test suite
#[derive(Parser)]
#[command(name = "svntest")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Generate util.rb and one wrapper per bindable module
  Env {
    /// Top of the source tree (contains build.conf)
    #[arg(long)]
    top_dir: PathBuf,

    /// Directory of the Ruby bindings inside the source tree
    #[arg(long)]
    base_dir: PathBuf,

    /// Directory the generated files are written to
    #[arg(long)]
    ext_dir: PathBuf,

    /// Build configuration to load the modules from
    #[arg(long, default_value = DEFAULT_BUILD_TYPE)]
    build_type: String,

    /// Print a JSON summary instead of text
    #[arg(long)]
    json: bool,
  },

  /// Print the PATH a generated util.rb would set up
  Paths {
    #[arg(long)]
    top_dir: PathBuf,

    #[arg(long)]
    base_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_BUILD_TYPE)]
    build_type: String,
  },

  /// Write a pre-revprop-change hook allowing one user to change one property
  Hook {
    /// Hook path without extension, e.g. <repos>/hooks/pre-revprop-change
    #[arg(long)]
    path: PathBuf,

    /// Authorized user (default: the current user)
    #[arg(long)]
    user: Option<String>,

    /// Authorized revision property
    #[arg(long, default_value = PROP_REVISION_LOG)]
    property: String,
  },

  /// Register svnserve as a service if needed and start it
  Start(ServiceArgs),

  /// Start svnserve, wait for Ctrl-C, then stop and remove it
  Serve(ServiceArgs),

  /// Stop the svnserve service if it exists
  Stop(ServiceArgs),

  /// Delete the svnserve service and its staging directory
  Remove(ServiceArgs),

  /// Show whether the svnserve service is registered
  Status(ServiceArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Env {
      top_dir,
      base_dir,
      ext_dir,
      build_type,
      json,
    } => cmd_env(&top_dir, &base_dir, &ext_dir, &build_type, json),
    Commands::Paths {
      top_dir,
      base_dir,
      build_type,
    } => cmd_paths(&top_dir, &base_dir, &build_type),
    Commands::Hook { path, user, property } => cmd_hook(&path, user, &property),
    Commands::Start(args) => cmd_start(&args).await,
    Commands::Serve(args) => cmd_serve(&args).await,
    Commands::Stop(args) => cmd_stop(&args).await,
    Commands::Remove(args) => cmd_remove(&args).await,
    Commands::Status(args) => cmd_status(&args).await,
  }
}
