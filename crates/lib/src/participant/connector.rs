//! Per-participant connection construction.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::{DistributionSelection, ParticipantConfig};
use crate::engine::{ConnectError, ConnectorFactory, EngineConnector};
use crate::identity::{BuildIdentity, ProjectIdentity};

/// Connects to one participant's engine and mints identities for its projects.
///
/// Holds nothing beyond its config, its build token and the project directory it targets. Cheap
/// to clone; narrowing with [`with_project_directory`](Self::with_project_directory) shares the
/// config.
#[derive(Debug, Clone)]
pub struct ParticipantConnector {
  config: Arc<ParticipantConfig>,
  build: BuildIdentity,
  project_dir: PathBuf,
}

impl ParticipantConnector {
  pub fn new(build: BuildIdentity, config: ParticipantConfig) -> Self {
    let project_dir = config.project_dir().to_path_buf();
    Self {
      config: Arc::new(config),
      build,
      project_dir,
    }
  }

  pub fn config(&self) -> &ParticipantConfig {
    &self.config
  }

  pub fn build(&self) -> &BuildIdentity {
    &self.build
  }

  pub fn project_dir(&self) -> &Path {
    &self.project_dir
  }

  /// Same participant, different target project directory.
  pub fn with_project_directory(&self, project_dir: impl Into<PathBuf>) -> Self {
    Self {
      config: Arc::clone(&self.config),
      build: self.build.clone(),
      project_dir: project_dir.into(),
    }
  }

  /// Identity of the project at `path` in this participant. The path is not checked.
  pub fn to_project_identity(&self, path: impl Into<String>) -> ProjectIdentity {
    ProjectIdentity::new(self.build.clone(), path)
  }

  /// Whether this connector targets the participant's root directory.
  pub fn is_root(&self) -> bool {
    self.config.root_dir() == self.project_dir
  }

  /// Apply this participant's settings to an unconfigured engine connector.
  pub fn configure<C: EngineConnector>(&self, connector: &mut C) {
    let config = &self.config;

    connector.use_user_home_dir(config.user_home());

    if let Some(dir) = config.daemon_base_dir() {
      connector.daemon_base_dir(dir);
    }

    if let Some(timeout) = config.daemon_idle_timeout() {
      connector.daemon_max_idle_time(timeout.value, timeout.unit);
    }

    // An ancestor directory may hold an unrelated build definition.
    if self.is_root() {
      connector.search_upwards(false);
    }

    match config.distribution() {
      DistributionSelection::Distribution(uri) => connector.use_distribution(&uri),
      DistributionSelection::Installation(dir) => connector.use_installation(&dir),
      DistributionSelection::Version(version) => connector.use_version(&version),
      DistributionSelection::BuildDeclared => connector.use_build_distribution(),
    }

    connector.for_project_directory(&self.project_dir);
  }

  /// Configure a fresh connector from `factory` and connect. Blocks until the engine answers.
  pub fn connect<F: ConnectorFactory>(
    &self,
    factory: &F,
  ) -> Result<<F::Connector as EngineConnector>::Connection, ConnectError> {
    debug!(
      participant = self.config.name(),
      project_dir = %self.project_dir.display(),
      root = self.is_root(),
      distribution = %self.config.distribution(),
      "connecting to participant"
    );

    let mut connector = factory.new_connector();
    self.configure(&mut connector);
    connector.connect()
  }
}
