//! Composite configuration file schema.

use std::path::PathBuf;

use serde::Deserialize;

use crate::participant::{ParticipantConfig, TimeUnit};
use crate::publication::ModuleCoordinate;

/// Top level of `weave.toml`, as written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompositeFile {
  pub user_home: Option<PathBuf>,
  pub daemon_base_dir: Option<PathBuf>,
  pub daemon_idle_timeout: Option<u64>,
  pub daemon_idle_timeout_unit: Option<TimeUnit>,
  #[serde(default)]
  pub participants: Vec<ParticipantFile>,
}

/// One `[[participants]]` table, as written.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParticipantFile {
  pub name: String,
  pub root_dir: PathBuf,
  pub project_dir: Option<PathBuf>,
  pub user_home: Option<PathBuf>,
  pub daemon_base_dir: Option<PathBuf>,
  pub daemon_idle_timeout: Option<u64>,
  pub daemon_idle_timeout_unit: Option<TimeUnit>,
  pub distribution: Option<String>,
  pub installation: Option<PathBuf>,
  pub version: Option<String>,
  #[serde(default)]
  pub publications: Vec<PublicationDecl>,
}

/// A coordinate a participant project declares it publishes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublicationDecl {
  /// Project path inside the participant, e.g. `:core`.
  pub project: String,
  pub coordinate: ModuleCoordinate,
}

/// A fully resolved participant: shared settings applied, paths absolute.
#[derive(Debug, Clone)]
pub struct ParticipantDecl {
  pub config: ParticipantConfig,
  pub publications: Vec<PublicationDecl>,
}

/// A fully resolved composite configuration.
#[derive(Debug, Clone, Default)]
pub struct CompositeConfig {
  pub participants: Vec<ParticipantDecl>,
}
