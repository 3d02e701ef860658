//! Participant configuration types.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
  Milliseconds,
  Seconds,
  Minutes,
  Hours,
  Days,
}

impl TimeUnit {
  fn millis(self) -> u64 {
    match self {
      TimeUnit::Milliseconds => 1,
      TimeUnit::Seconds => 1_000,
      TimeUnit::Minutes => 60_000,
      TimeUnit::Hours => 3_600_000,
      TimeUnit::Days => 86_400_000,
    }
  }
}

impl fmt::Display for TimeUnit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      TimeUnit::Milliseconds => "milliseconds",
      TimeUnit::Seconds => "seconds",
      TimeUnit::Minutes => "minutes",
      TimeUnit::Hours => "hours",
      TimeUnit::Days => "days",
    };
    f.write_str(s)
  }
}

/// Daemon idle timeout. Value and unit always travel together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdleTimeout {
  pub value: u64,
  pub unit: TimeUnit,
}

impl IdleTimeout {
  pub fn new(value: u64, unit: TimeUnit) -> Self {
    Self { value, unit }
  }

  /// Build from a raw (value, unit) pair where either half may be missing.
  ///
  /// Both present yields a timeout, both absent yields `None`. A lone half is ambiguous and is
  /// rejected rather than defaulted.
  pub fn from_parts(
    participant: Option<&str>,
    value: Option<u64>,
    unit: Option<TimeUnit>,
  ) -> Result<Option<Self>, ConfigError> {
    match (value, unit) {
      (Some(value), Some(unit)) => Ok(Some(Self::new(value, unit))),
      (None, None) => Ok(None),
      (value, unit) => Err(ConfigError::AmbiguousIdleTimeout {
        participant: participant.map(str::to_string),
        value,
        unit,
      }),
    }
  }

  pub fn as_duration(&self) -> Duration {
    Duration::from_millis(self.value.saturating_mul(self.unit.millis()))
  }
}

impl fmt::Display for IdleTimeout {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.value, self.unit)
  }
}

/// The one distribution mode applied to a connection.
///
/// Variants are listed in precedence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionSelection {
  /// Explicit distribution archive or URI.
  Distribution(String),
  /// Explicit local installation directory.
  Installation(PathBuf),
  /// Explicit engine version string.
  Version(String),
  /// Whatever distribution the target build itself declares.
  BuildDeclared,
}

impl fmt::Display for DistributionSelection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DistributionSelection::Distribution(uri) => write!(f, "distribution {}", uri),
      DistributionSelection::Installation(dir) => write!(f, "installation {}", dir.display()),
      DistributionSelection::Version(v) => write!(f, "version {}", v),
      DistributionSelection::BuildDeclared => f.write_str("build-declared distribution"),
    }
  }
}

/// Everything known about one participant build before any connection exists.
///
/// Immutable once built. Use [`ParticipantConfig::with_project_dir`] to address a nested
/// sub-project; it copies, never mutates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantConfig {
  name: String,
  root_dir: PathBuf,
  project_dir: PathBuf,
  user_home: PathBuf,
  daemon_base_dir: Option<PathBuf>,
  daemon_idle_timeout: Option<IdleTimeout>,
  distribution: Option<String>,
  installation: Option<PathBuf>,
  version: Option<String>,
}

impl ParticipantConfig {
  /// Start building a config. Paths are taken as given and should be absolute and canonical.
  pub fn builder(
    name: impl Into<String>,
    root_dir: impl Into<PathBuf>,
    user_home: impl Into<PathBuf>,
  ) -> ParticipantConfigBuilder {
    ParticipantConfigBuilder::new(name.into(), root_dir.into(), user_home.into())
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn root_dir(&self) -> &Path {
    &self.root_dir
  }

  pub fn project_dir(&self) -> &Path {
    &self.project_dir
  }

  pub fn user_home(&self) -> &Path {
    &self.user_home
  }

  pub fn daemon_base_dir(&self) -> Option<&Path> {
    self.daemon_base_dir.as_deref()
  }

  pub fn daemon_idle_timeout(&self) -> Option<IdleTimeout> {
    self.daemon_idle_timeout
  }

  /// Resolve the distribution mode: distribution > installation > version > build-declared.
  pub fn distribution(&self) -> DistributionSelection {
    if let Some(uri) = &self.distribution {
      DistributionSelection::Distribution(uri.clone())
    } else if let Some(dir) = &self.installation {
      DistributionSelection::Installation(dir.clone())
    } else if let Some(version) = &self.version {
      DistributionSelection::Version(version.clone())
    } else {
      DistributionSelection::BuildDeclared
    }
  }

  /// Whether the project directory is the participant's root directory.
  ///
  /// Plain path equality; no normalization is applied.
  pub fn is_root_target(&self) -> bool {
    self.project_dir == self.root_dir
  }

  /// A copy of this config targeting `project_dir`. Everything else is shared.
  pub fn with_project_dir(&self, project_dir: impl Into<PathBuf>) -> Self {
    Self {
      project_dir: project_dir.into(),
      ..self.clone()
    }
  }
}

#[derive(Debug, Clone)]
pub struct ParticipantConfigBuilder {
  name: String,
  root_dir: PathBuf,
  project_dir: Option<PathBuf>,
  user_home: PathBuf,
  daemon_base_dir: Option<PathBuf>,
  idle_value: Option<u64>,
  idle_unit: Option<TimeUnit>,
  distribution: Option<String>,
  installation: Option<PathBuf>,
  version: Option<String>,
}

impl ParticipantConfigBuilder {
  fn new(name: String, root_dir: PathBuf, user_home: PathBuf) -> Self {
    Self {
      name,
      root_dir,
      project_dir: None,
      user_home,
      daemon_base_dir: None,
      idle_value: None,
      idle_unit: None,
      distribution: None,
      installation: None,
      version: None,
    }
  }

  pub fn project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.project_dir = Some(dir.into());
    self
  }

  pub fn daemon_base_dir(mut self, dir: Option<PathBuf>) -> Self {
    self.daemon_base_dir = dir;
    self
  }

  /// Set the raw idle-timeout pair. Supplying only one half fails at [`build`](Self::build).
  pub fn daemon_idle_timeout(mut self, value: Option<u64>, unit: Option<TimeUnit>) -> Self {
    self.idle_value = value;
    self.idle_unit = unit;
    self
  }

  pub fn distribution(mut self, uri: Option<String>) -> Self {
    self.distribution = uri;
    self
  }

  pub fn installation(mut self, dir: Option<PathBuf>) -> Self {
    self.installation = dir;
    self
  }

  pub fn version(mut self, version: Option<String>) -> Self {
    self.version = version;
    self
  }

  pub fn build(self) -> Result<ParticipantConfig, ConfigError> {
    let daemon_idle_timeout = IdleTimeout::from_parts(Some(self.name.as_str()), self.idle_value, self.idle_unit)?;
    let project_dir = self.project_dir.unwrap_or_else(|| self.root_dir.clone());

    Ok(ParticipantConfig {
      name: self.name,
      root_dir: self.root_dir,
      project_dir,
      user_home: self.user_home,
      daemon_base_dir: self.daemon_base_dir,
      daemon_idle_timeout,
      distribution: self.distribution,
      installation: self.installation,
      version: self.version,
    })
  }
}
