//! Build and project identities.
//!
//! A [`BuildIdentity`] is an opaque token minted once per participant build. It compares by
//! reference: two tokens are equal only if one is a clone of the other, even when they carry the
//! same name and root directory. A [`ProjectIdentity`] pairs such a token with a project path.
//!
//! Comparing a [`ProjectIdentity`] against a build token it was not minted from is a caller
//! contract violation; [`ProjectIdentity::belongs_to`] is the runtime check for it.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Path of the root project of a build.
pub const ROOT_PROJECT_PATH: &str = ":";

#[derive(Debug)]
struct BuildToken {
  name: String,
  root_dir: PathBuf,
}

/// Opaque, unique-per-participant token.
#[derive(Clone)]
pub struct BuildIdentity(Arc<BuildToken>);

impl BuildIdentity {
  /// Mint a new token. Every call produces a token distinct from all others.
  pub fn new(name: impl Into<String>, root_dir: impl Into<PathBuf>) -> Self {
    Self(Arc::new(BuildToken {
      name: name.into(),
      root_dir: root_dir.into(),
    }))
  }

  pub fn name(&self) -> &str {
    &self.0.name
  }

  pub fn root_dir(&self) -> &Path {
    &self.0.root_dir
  }
}

impl PartialEq for BuildIdentity {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for BuildIdentity {}

impl Hash for BuildIdentity {
  fn hash<H: Hasher>(&self, state: &mut H) {
    std::ptr::hash(Arc::as_ptr(&self.0), state);
  }
}

impl fmt::Debug for BuildIdentity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("BuildIdentity")
      .field("name", &self.0.name)
      .field("root_dir", &self.0.root_dir)
      .finish()
  }
}

impl fmt::Display for BuildIdentity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0.name)
  }
}

/// A project inside a participant build.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectIdentity {
  build: BuildIdentity,
  path: String,
}

impl ProjectIdentity {
  pub fn new(build: BuildIdentity, path: impl Into<String>) -> Self {
    Self {
      build,
      path: path.into(),
    }
  }

  pub fn build(&self) -> &BuildIdentity {
    &self.build
  }

  pub fn path(&self) -> &str {
    &self.path
  }

  /// Whether this identifies the root project (`:` or the empty path).
  pub fn is_root(&self) -> bool {
    self.path.is_empty() || self.path == ROOT_PROJECT_PATH
  }

  /// Whether this identity was minted from `build`.
  pub fn belongs_to(&self, build: &BuildIdentity) -> bool {
    self.build == *build
  }
}

impl fmt::Display for ProjectIdentity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_root() {
      write!(f, "{}{}", self.build, ROOT_PROJECT_PATH)
    } else {
      write!(f, "{}{}", self.build, self.path)
    }
  }
}
