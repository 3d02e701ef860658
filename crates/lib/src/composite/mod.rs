//! Composite session coordination.
//!
//! A [`CompositeCoordinator`] owns one [`ParticipantConnector`] per participant build and the
//! [`PublicationRegistry`] used to decide whether an external coordinate can be substituted by a
//! project inside the composite.
//!
//! Setup-time collisions abort immediately. Connection failures are collected per participant:
//! [`CompositeCoordinator::connect_all`] connects every participant concurrently and never lets one
//! participant's failure, hang or panic stop the others.

mod connect;

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{self, CompositeConfig, ConfigError};
use crate::engine::ConnectError;
use crate::identity::{BuildIdentity, ProjectIdentity};
use crate::participant::{ParticipantConfig, ParticipantConnector};
use crate::publication::{CollisionError, ModuleCoordinate, PublicationIdentity, PublicationRegistry};

pub use connect::ConnectOptions;

/// Errors from assembling a composite session.
#[derive(Debug, Error)]
pub enum CompositeError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error("participant '{0}' is already part of the composite")]
  DuplicateParticipant(String),

  #[error("no participant named '{0}'")]
  UnknownParticipant(String),

  /// A project identity minted from a build token this composite does not own.
  #[error("project {0} does not belong to any participant of this composite")]
  ForeignIdentity(ProjectIdentity),

  #[error(transparent)]
  Collision(#[from] CollisionError),
}

/// Outcome of connecting every participant.
#[derive(Debug)]
pub struct ConnectReport<C> {
  pub connected: BTreeMap<String, C>,
  pub failed: BTreeMap<String, ConnectError>,
}

impl<C> Default for ConnectReport<C> {
  fn default() -> Self {
    Self {
      connected: BTreeMap::new(),
      failed: BTreeMap::new(),
    }
  }
}

impl<C> ConnectReport<C> {
  pub fn is_success(&self) -> bool {
    self.failed.is_empty()
  }
}

#[derive(Debug, Default)]
pub struct CompositeCoordinator {
  participants: Vec<ParticipantConnector>,
  registry: PublicationRegistry,
}

impl CompositeCoordinator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Load the config file at `path` and build a composite from it.
  pub fn load(path: &Path) -> Result<Self, CompositeError> {
    let config = config::load(path)?;
    Self::from_config(&config)
  }

  /// Build a composite from resolved configuration.
  ///
  /// Participants are added in declaration order, then their declared publications are
  /// registered. The first collision aborts.
  pub fn from_config(config: &CompositeConfig) -> Result<Self, CompositeError> {
    let mut composite = Self::new();
    for decl in &config.participants {
      composite.add_participant(decl.config.clone())?;
    }
    for decl in &config.participants {
      for publication in &decl.publications {
        composite.register_publication(decl.config.name(), &publication.project, publication.coordinate.clone())?;
      }
    }

    info!(
      participants = composite.participants.len(),
      publications = composite.registry.len(),
      "composite initialized"
    );
    Ok(composite)
  }

  /// Register a participant and mint its build token.
  pub fn add_participant(&mut self, config: ParticipantConfig) -> Result<BuildIdentity, CompositeError> {
    if self.participants.iter().any(|p| p.config().name() == config.name()) {
      return Err(CompositeError::DuplicateParticipant(config.name().to_string()));
    }

    let build = BuildIdentity::new(config.name(), config.root_dir());
    debug!(participant = config.name(), root_dir = %config.root_dir().display(), "added participant");
    self.participants.push(ParticipantConnector::new(build.clone(), config));
    Ok(build)
  }

  pub fn participants(&self) -> &[ParticipantConnector] {
    &self.participants
  }

  pub fn connector(&self, name: &str) -> Result<&ParticipantConnector, CompositeError> {
    self
      .participants
      .iter()
      .find(|p| p.config().name() == name)
      .ok_or_else(|| CompositeError::UnknownParticipant(name.to_string()))
  }

  /// The connector owning `project`'s build token.
  pub fn connector_for(&self, project: &ProjectIdentity) -> Result<&ParticipantConnector, CompositeError> {
    self
      .participants
      .iter()
      .find(|p| project.belongs_to(p.build()))
      .ok_or_else(|| CompositeError::ForeignIdentity(project.clone()))
  }

  /// Record that `project` publishes `publication`.
  pub fn register(&self, project: ProjectIdentity, publication: PublicationIdentity) -> Result<(), CompositeError> {
    self.connector_for(&project)?;
    self.registry.register(project, publication)?;
    Ok(())
  }

  /// Record that the project at `project_path` in participant `name` publishes `coordinate`.
  pub fn register_publication(
    &self,
    name: &str,
    project_path: &str,
    coordinate: ModuleCoordinate,
  ) -> Result<ProjectIdentity, CompositeError> {
    let project = self.connector(name)?.to_project_identity(project_path);
    self.register(project.clone(), PublicationIdentity::new(coordinate))?;
    Ok(project)
  }

  /// The in-composite project that can substitute `coordinate`, if any.
  pub fn lookup(&self, coordinate: &ModuleCoordinate) -> Option<ProjectIdentity> {
    self.registry.lookup(coordinate)
  }

  /// Every registered publication with its owning project, ordered by coordinate.
  ///
  /// Registration goes through [`register`](Self::register), which rejects foreign identities.
  pub fn publications(&self) -> Vec<(PublicationIdentity, ProjectIdentity)> {
    self.registry.entries()
  }
}
