//! Platform helpers: privilege checks and path normalization.

pub mod paths;

/// Check if the current process is running with elevated privileges.
///
/// Creating and deleting services needs an administrator token on Windows;
/// on Unix this checks for an effective user ID of root.
#[cfg(unix)]
pub fn is_elevated() -> bool {
  rustix::process::geteuid().is_root()
}

#[cfg(windows)]
pub fn is_elevated() -> bool {
  use std::mem::{size_of, zeroed};
  use windows_sys::Win32::{
    Foundation::CloseHandle,
    Security::{GetTokenInformation, TOKEN_ELEVATION, TOKEN_QUERY, TokenElevation},
    System::Threading::{GetCurrentProcess, OpenProcessToken},
  };

  unsafe {
    let mut token = std::ptr::null_mut();
    if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token) == 0 {
      return false;
    }

    let mut elevation: TOKEN_ELEVATION = zeroed();
    let mut size: u32 = 0;
    let result = GetTokenInformation(
      token,
      TokenElevation,
      &mut elevation as *mut _ as *mut _,
      size_of::<TOKEN_ELEVATION>() as u32,
      &mut size,
    );

    CloseHandle(token);
    result != 0 && elevation.TokenIsElevated != 0
  }
}

/// Name of the user running the process, from `USERNAME` (Windows) or `USER`.
pub fn current_username() -> Option<String> {
  ["USERNAME", "USER"]
    .iter()
    .filter_map(|var| std::env::var(var).ok())
    .find(|name| !name.is_empty())
}
