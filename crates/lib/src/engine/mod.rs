//! Execution-engine capability contract.
//!
//! A participant's build runs inside an external engine reached through an [`EngineConnector`].
//! Each target engine implements the trait once; a [`ConnectorFactory`] picks the engine and hands
//! out fresh, unconfigured connectors. [`ParticipantConnector`](crate::participant::ParticipantConnector)
//! drives the configuration sequence.
//!
//! - [`plan`] - Engine that records settings instead of connecting (dry run)

pub mod plan;

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::participant::TimeUnit;

/// Engine-level connection failures.
#[derive(Debug, Error)]
pub enum ConnectError {
  /// The engine or its daemon could not be started.
  #[error("failed to start engine: {message}")]
  Spawn { message: String },

  /// The engine started but the handshake failed (port conflict, protocol error).
  #[error("handshake with engine failed: {message}")]
  Handshake { message: String },

  /// The selected distribution cannot serve this client.
  #[error("incompatible engine version {found}: {message}")]
  IncompatibleVersion { found: String, message: String },

  /// A directory the engine needs is not accessible.
  #[error("permission denied for {}: {source}", path.display())]
  Permission {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The target project directory does not exist.
  #[error("project directory does not exist: {}", path.display())]
  ProjectDirMissing { path: PathBuf },

  /// The connect call did not finish within its budget.
  #[error("connect timed out after {}s", after.as_secs_f64())]
  TimedOut { after: Duration },

  /// The connect task ended without producing a result.
  #[error("connect aborted: {message}")]
  Aborted { message: String },
}

/// Configuration surface of one target engine.
///
/// Connectors are single-use: configure, then [`connect`](EngineConnector::connect) consumes them.
pub trait EngineConnector {
  type Connection;

  fn use_user_home_dir(&mut self, dir: &Path);

  fn daemon_base_dir(&mut self, dir: &Path);

  fn daemon_max_idle_time(&mut self, value: u64, unit: TimeUnit);

  fn search_upwards(&mut self, enabled: bool);

  /// Use whatever distribution the target build declares.
  fn use_build_distribution(&mut self);

  fn use_version(&mut self, version: &str);

  fn use_installation(&mut self, dir: &Path);

  fn use_distribution(&mut self, uri: &str);

  fn for_project_directory(&mut self, dir: &Path);

  /// Establish the connection. May block on process startup and handshake.
  fn connect(self) -> Result<Self::Connection, ConnectError>;
}

/// Selects the engine and mints unconfigured connectors for it.
pub trait ConnectorFactory: Send + Sync {
  type Connector: EngineConnector;

  fn new_connector(&self) -> Self::Connector;
}
