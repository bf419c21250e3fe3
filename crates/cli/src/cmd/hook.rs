//! Implementation of the `svntest hook` command.

use std::path::Path;

use anyhow::{Context, Result, bail};

use svntest_lib::platform::current_username;
use svntest_lib::write_pre_revprop_change_hook;

/// Execute the hook command.
///
/// Writes `<path>.cmd` allowing `user` (the current user if not given) to
/// change `property` and refusing every other revision property change.
pub fn cmd_hook(path: &Path, user: Option<String>, property: &str) -> Result<()> {
  let Some(user) = user.or_else(current_username) else {
    bail!("No --user given and the current user is unknown");
  };

  let written = write_pre_revprop_change_hook(path, &user, property)
    .with_context(|| format!("Failed to write hook {}", path.display()))?;

  println!("Hook: {}", written.display());
  println!("Allows: {} on {}", user, property);

  Ok(())
}
