use crate::consts::{USER_HOME_DIRNAME, USER_HOME_ENV};
use std::path::PathBuf;

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("USERPROFILE").map(PathBuf::from)
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("HOME").map(PathBuf::from)
}

/// Returns the shared user-home directory handed to every participant engine.
///
/// `WEAVE_USER_HOME` takes precedence; otherwise `.weave` under the user's home.
/// Returns `None` when neither can be determined.
pub fn default_user_home_dir() -> Option<PathBuf> {
  if let Some(dir) = std::env::var_os(USER_HOME_ENV).filter(|v| !v.is_empty()) {
    return Some(PathBuf::from(dir));
  }
  home_dir().map(|home| home.join(USER_HOME_DIRNAME))
}
