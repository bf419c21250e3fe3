//! Implementation of the `svntest env` and `svntest paths` commands.
//!
//! `env` materializes the Ruby test environment for a Windows build; `paths`
//! shows the resulting `PATH` without writing anything.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use svntest_lib::{EnvironmentGenerator, SearchPath};

/// Execute the env command.
///
/// Writes `util.rb` and one wrapper per `[swig_X]` section of `build.conf`
/// into `ext_dir`.
///
/// # Errors
///
/// Returns an error if `build.conf` cannot be read, `base_dir` is not inside
/// `top_dir`, or a file cannot be written.
pub fn cmd_env(top_dir: &Path, base_dir: &Path, ext_dir: &Path, build_type: &str, json: bool) -> Result<()> {
  let generated = EnvironmentGenerator::new(top_dir, base_dir, ext_dir)
    .with_build_type(build_type)
    .generate()
    .with_context(|| format!("Failed to generate test environment in {}", ext_dir.display()))?;

  if json {
    let summary = serde_json::json!({
      "util": generated.util_path,
      "wrappers": generated.wrapper_paths,
      "modules": generated.modules,
      "library_dirs": generated.library_dirs,
      "dll_dir": generated.layout.dll_dir,
    });
    println!(
      "{}",
      serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
    );
    return Ok(());
  }

  println!("{} test environment", "Generated".green().bold());
  println!();
  println!("  Util:      {}", generated.util_path.display());
  println!("  Modules:   {}", generated.modules.join(", "));
  println!("  DLL dir:   {}", generated.layout.dll_dir.display());
  println!("  PATH dirs: {}", generated.library_dirs.len());

  Ok(())
}

/// Execute the paths command.
///
/// Prints the current `PATH` with the generated directories prepended, the
/// way loading `util.rb` would change it.
pub fn cmd_paths(top_dir: &Path, base_dir: &Path, build_type: &str) -> Result<()> {
  let dirs = EnvironmentGenerator::new(top_dir, base_dir, PathBuf::new())
    .with_build_type(build_type)
    .library_dirs()
    .context("Failed to compute library directories")?;

  let mut path = SearchPath::from_env();
  path.prepend_all(dirs.iter().map(|dir| dir.to_string_lossy()));

  println!("{}", path);

  Ok(())
}
