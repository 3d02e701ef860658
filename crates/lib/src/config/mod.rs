//! Composite configuration loading.
//!
//! A composite is described by a TOML file (`weave.toml`). Shared settings at the top level apply
//! to every participant unless the participant sets its own:
//!
//! ```toml
//! user_home = "/home/me/.weave"
//! daemon_idle_timeout = 3
//! daemon_idle_timeout_unit = "hours"
//!
//! [[participants]]
//! name = "a"
//! root_dir = "repoA"
//! version = "8.5"
//!
//!   [[participants.publications]]
//!   project = ":core"
//!   coordinate = "com.acme:core:1.0"
//! ```
//!
//! Relative paths resolve against the directory holding the file. The idle-timeout pair is
//! validated per level and a participant pair replaces the top-level pair as a whole.

mod types;

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::participant::{IdleTimeout, ParticipantConfig, TimeUnit};
use crate::platform::paths::default_user_home_dir;

pub use types::*;

/// Errors from reading or validating composite configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse config {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: Box<toml::de::Error>,
  },

  /// Only one half of the idle-timeout (value, unit) pair was given.
  #[error("{}", ambiguous_idle_timeout(participant.as_deref(), *value, *unit))]
  AmbiguousIdleTimeout {
    participant: Option<String>,
    value: Option<u64>,
    unit: Option<TimeUnit>,
  },

  #[error("participant '{0}' is declared more than once")]
  DuplicateParticipant(String),

  #[error("participant name must not be empty")]
  EmptyParticipantName,

  #[error("no user home configured and none could be derived from the environment")]
  NoUserHome,
}

fn ambiguous_idle_timeout(participant: Option<&str>, value: Option<u64>, unit: Option<TimeUnit>) -> String {
  let scope = match participant {
    Some(name) => format!("participant '{}'", name),
    None => "composite".to_string(),
  };
  let given = match (value, unit) {
    (Some(v), None) => format!("value {} without a unit", v),
    (None, Some(u)) => format!("unit {} without a value", u),
    _ => "an incomplete pair".to_string(),
  };
  format!("daemon idle timeout for {} needs both a value and a unit, got {}", scope, given)
}

/// Load and resolve a composite config file.
pub fn load(path: &Path) -> Result<CompositeConfig, ConfigError> {
  let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  let base_dir = config_dir(path)?;

  let file: CompositeFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
    path: path.to_path_buf(),
    source: Box::new(source),
  })?;

  info!(path = %path.display(), participants = file.participants.len(), "loaded composite config");
  resolve(file, &base_dir)
}

/// Absolute directory holding the config file. A bare filename lives in the current directory.
fn config_dir(path: &Path) -> Result<PathBuf, ConfigError> {
  let parent = path.parent().unwrap_or_else(|| Path::new(""));
  let dir = if parent.is_absolute() {
    parent.to_path_buf()
  } else {
    let cwd = std::env::current_dir().map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    cwd.join(parent)
  };
  Ok(dunce::canonicalize(&dir).unwrap_or_else(|_| dunce::simplified(&dir).to_path_buf()))
}

/// Resolve a parsed file: apply shared settings, check the idle-timeout pairs, absolutize paths.
pub fn resolve(file: CompositeFile, base_dir: &Path) -> Result<CompositeConfig, ConfigError> {
  let shared_idle = IdleTimeout::from_parts(None, file.daemon_idle_timeout, file.daemon_idle_timeout_unit)?;
  let shared_user_home = file.user_home.as_deref().map(|p| resolve_path(base_dir, p));
  let shared_daemon_base_dir = file.daemon_base_dir.as_deref().map(|p| resolve_path(base_dir, p));

  let mut seen = HashSet::new();
  let mut participants = Vec::with_capacity(file.participants.len());

  for participant in file.participants {
    if participant.name.is_empty() {
      return Err(ConfigError::EmptyParticipantName);
    }
    if !seen.insert(participant.name.clone()) {
      return Err(ConfigError::DuplicateParticipant(participant.name));
    }

    let idle = IdleTimeout::from_parts(
      Some(participant.name.as_str()),
      participant.daemon_idle_timeout,
      participant.daemon_idle_timeout_unit,
    )?
    .or(shared_idle);

    let user_home = match participant.user_home.as_deref() {
      Some(p) => resolve_path(base_dir, p),
      None => shared_user_home
        .clone()
        .or_else(default_user_home_dir)
        .ok_or(ConfigError::NoUserHome)?,
    };

    let daemon_base_dir = participant
      .daemon_base_dir
      .as_deref()
      .map(|p| resolve_path(base_dir, p))
      .or_else(|| shared_daemon_base_dir.clone());

    let root_dir = resolve_path(base_dir, &participant.root_dir);
    let mut builder = ParticipantConfig::builder(&participant.name, root_dir, user_home)
      .daemon_base_dir(daemon_base_dir)
      .daemon_idle_timeout(idle.map(|t| t.value), idle.map(|t| t.unit))
      .distribution(participant.distribution)
      .installation(participant.installation.as_deref().map(|p| resolve_path(base_dir, p)))
      .version(participant.version);
    if let Some(project_dir) = participant.project_dir.as_deref() {
      builder = builder.project_dir(resolve_path(base_dir, project_dir));
    }
    let config = builder.build()?;

    debug!(
      participant = config.name(),
      root_dir = %config.root_dir().display(),
      project_dir = %config.project_dir().display(),
      "resolved participant"
    );

    participants.push(ParticipantDecl {
      config,
      publications: participant.publications,
    });
  }

  Ok(CompositeConfig { participants })
}

/// Join `path` onto `base_dir` when relative, then canonicalize if it exists.
fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
  let joined = if path.is_absolute() {
    path.to_path_buf()
  } else {
    base_dir.join(path)
  };
  dunce::canonicalize(&joined).unwrap_or_else(|_| dunce::simplified(&joined).to_path_buf())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::participant::DistributionSelection;
  use tempfile::TempDir;

  fn write_config(temp: &TempDir, contents: &str) -> PathBuf {
    let path = temp.path().join(crate::consts::CONFIG_FILENAME);
    fs::write(&path, contents).unwrap();
    path
  }

  fn canonical(temp: &TempDir) -> PathBuf {
    dunce::canonicalize(temp.path()).unwrap()
  }

  #[test]
  fn loads_participants_with_relative_paths() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("repoA/app")).unwrap();
    let path = write_config(
      &temp,
      r#"
user_home = "home"

[[participants]]
name = "a"
root_dir = "repoA"
project_dir = "repoA/app"
version = "8.5"

  [[participants.publications]]
  project = ":core"
  coordinate = "com.acme:core:1.0"
"#,
    );

    let config = load(&path).unwrap();
    let base = canonical(&temp);

    assert_eq!(config.participants.len(), 1);
    let a = &config.participants[0];
    assert_eq!(a.config.name(), "a");
    assert_eq!(a.config.root_dir(), base.join("repoA"));
    assert_eq!(a.config.project_dir(), base.join("repoA").join("app"));
    assert_eq!(a.config.user_home(), base.join("home"));
    assert_eq!(a.config.distribution(), DistributionSelection::Version("8.5".to_string()));
    assert_eq!(a.publications[0].project, ":core");
    assert_eq!(a.publications[0].coordinate.to_string(), "com.acme:core:1.0");
  }

  #[test]
  fn participant_settings_override_shared() {
    let file: CompositeFile = toml::from_str(
      r#"
user_home = "/shared/home"
daemon_base_dir = "/shared/daemons"
daemon_idle_timeout = 3
daemon_idle_timeout_unit = "hours"

[[participants]]
name = "a"
root_dir = "/repoA"

[[participants]]
name = "b"
root_dir = "/repoB"
user_home = "/b/home"
daemon_base_dir = "/b/daemons"
daemon_idle_timeout = 10
daemon_idle_timeout_unit = "minutes"
"#,
    )
    .unwrap();

    let config = resolve(file, Path::new("/")).unwrap();
    let a = &config.participants[0].config;
    let b = &config.participants[1].config;

    assert_eq!(a.user_home(), Path::new("/shared/home"));
    assert_eq!(a.daemon_base_dir(), Some(Path::new("/shared/daemons")));
    assert_eq!(a.daemon_idle_timeout(), Some(IdleTimeout::new(3, TimeUnit::Hours)));
    assert_eq!(b.user_home(), Path::new("/b/home"));
    assert_eq!(b.daemon_base_dir(), Some(Path::new("/b/daemons")));
    assert_eq!(b.daemon_idle_timeout(), Some(IdleTimeout::new(10, TimeUnit::Minutes)));
  }

  #[test]
  fn ambiguous_shared_idle_timeout_is_rejected() {
    let file: CompositeFile = toml::from_str("user_home = \"/h\"\ndaemon_idle_timeout = 3\n").unwrap();

    let err = resolve(file, Path::new("/")).unwrap_err();
    assert!(matches!(
      err,
      ConfigError::AmbiguousIdleTimeout {
        participant: None,
        value: Some(3),
        unit: None
      }
    ));
    assert!(err.to_string().contains("value 3 without a unit"));
  }

  #[test]
  fn participant_half_pair_is_not_completed_from_shared() {
    let file: CompositeFile = toml::from_str(
      r#"
user_home = "/h"
daemon_idle_timeout = 3
daemon_idle_timeout_unit = "hours"

[[participants]]
name = "a"
root_dir = "/repoA"
daemon_idle_timeout_unit = "minutes"
"#,
    )
    .unwrap();

    let err = resolve(file, Path::new("/")).unwrap_err();
    assert!(matches!(
      err,
      ConfigError::AmbiguousIdleTimeout { participant: Some(ref p), value: None, unit: Some(TimeUnit::Minutes) } if p == "a"
    ));
  }

  #[test]
  fn duplicate_participant_is_rejected() {
    let file: CompositeFile = toml::from_str(
      r#"
user_home = "/h"

[[participants]]
name = "a"
root_dir = "/repoA"

[[participants]]
name = "a"
root_dir = "/repoB"
"#,
    )
    .unwrap();

    assert!(matches!(
      resolve(file, Path::new("/")),
      Err(ConfigError::DuplicateParticipant(name)) if name == "a"
    ));
  }

  #[test]
  fn unknown_keys_are_rejected() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "user_home = \"/h\"\nbogus = 1\n");

    assert!(matches!(load(&path), Err(ConfigError::Parse { .. })));
  }

  #[test]
  fn invalid_coordinate_is_a_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = write_config(
      &temp,
      r#"
[[participants]]
name = "a"
root_dir = "/repoA"

  [[participants.publications]]
  project = ":core"
  coordinate = "not-a-coordinate"
"#,
    );

    assert!(matches!(load(&path), Err(ConfigError::Parse { .. })));
  }

  #[test]
  fn missing_file_is_a_read_error() {
    let temp = TempDir::new().unwrap();
    assert!(matches!(
      load(&temp.path().join("absent.toml")),
      Err(ConfigError::Read { .. })
    ));
  }

  #[test]
  #[serial_test::serial]
  fn bare_filename_resolves_against_current_dir() {
    let temp = TempDir::new().unwrap();
    write_config(
      &temp,
      r#"
user_home = "home"
daemon_base_dir = "daemons"

[[participants]]
name = "a"
root_dir = "repoA"
"#,
    );
    let base = canonical(&temp);
    let previous = std::env::current_dir().unwrap();

    std::env::set_current_dir(temp.path()).unwrap();
    let loaded = load(Path::new(crate::consts::CONFIG_FILENAME));
    std::env::set_current_dir(previous).unwrap();

    let config = loaded.unwrap();
    let a = &config.participants[0].config;
    assert_eq!(a.root_dir(), base.join("repoA"));
    assert_eq!(a.project_dir(), base.join("repoA"));
    assert_eq!(a.user_home(), base.join("home"));
    assert_eq!(a.daemon_base_dir(), Some(base.join("daemons").as_path()));
    assert!(a.root_dir().is_absolute());
  }

  #[test]
  #[serial_test::serial]
  fn user_home_falls_back_to_environment() {
    temp_env::with_var(crate::consts::USER_HOME_ENV, Some("/env/home"), || {
      let file: CompositeFile = toml::from_str(
        r#"
[[participants]]
name = "a"
root_dir = "/repoA"
"#,
      )
      .unwrap();

      let config = resolve(file, Path::new("/")).unwrap();
      assert_eq!(config.participants[0].config.user_home(), Path::new("/env/home"));
    });
  }
}
