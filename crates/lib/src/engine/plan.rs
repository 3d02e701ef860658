//! Dry-run engine.
//!
//! [`PlanEngine`] hands out connectors that record every setting they receive. Connecting yields a
//! [`ConnectionPlan`] describing exactly what a real engine would have been asked to do, after
//! checking that the target project directory exists.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{ConnectError, ConnectorFactory, EngineConnector};
use crate::participant::{DistributionSelection, IdleTimeout, TimeUnit};

/// The settings a connection would be established with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionPlan {
  pub project_dir: PathBuf,
  pub user_home: Option<PathBuf>,
  pub daemon_base_dir: Option<PathBuf>,
  pub daemon_idle_timeout: Option<IdleTimeout>,
  pub search_upwards: bool,
  pub distribution: DistributionSelection,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlanEngine;

impl ConnectorFactory for PlanEngine {
  type Connector = PlanConnector;

  fn new_connector(&self) -> PlanConnector {
    PlanConnector::default()
  }
}

#[derive(Debug, Clone)]
pub struct PlanConnector {
  project_dir: Option<PathBuf>,
  user_home: Option<PathBuf>,
  daemon_base_dir: Option<PathBuf>,
  daemon_idle_timeout: Option<IdleTimeout>,
  search_upwards: bool,
  distribution: DistributionSelection,
}

impl Default for PlanConnector {
  fn default() -> Self {
    Self {
      project_dir: None,
      user_home: None,
      daemon_base_dir: None,
      daemon_idle_timeout: None,
      search_upwards: true,
      distribution: DistributionSelection::BuildDeclared,
    }
  }
}

impl EngineConnector for PlanConnector {
  type Connection = ConnectionPlan;

  fn use_user_home_dir(&mut self, dir: &Path) {
    self.user_home = Some(dir.to_path_buf());
  }

  fn daemon_base_dir(&mut self, dir: &Path) {
    self.daemon_base_dir = Some(dir.to_path_buf());
  }

  fn daemon_max_idle_time(&mut self, value: u64, unit: TimeUnit) {
    self.daemon_idle_timeout = Some(IdleTimeout::new(value, unit));
  }

  fn search_upwards(&mut self, enabled: bool) {
    self.search_upwards = enabled;
  }

  fn use_build_distribution(&mut self) {
    self.distribution = DistributionSelection::BuildDeclared;
  }

  fn use_version(&mut self, version: &str) {
    self.distribution = DistributionSelection::Version(version.to_string());
  }

  fn use_installation(&mut self, dir: &Path) {
    self.distribution = DistributionSelection::Installation(dir.to_path_buf());
  }

  fn use_distribution(&mut self, uri: &str) {
    self.distribution = DistributionSelection::Distribution(uri.to_string());
  }

  fn for_project_directory(&mut self, dir: &Path) {
    self.project_dir = Some(dir.to_path_buf());
  }

  fn connect(self) -> Result<ConnectionPlan, ConnectError> {
    let project_dir = self
      .project_dir
      .ok_or_else(|| ConnectError::ProjectDirMissing { path: PathBuf::new() })?;
    if !project_dir.is_dir() {
      return Err(ConnectError::ProjectDirMissing { path: project_dir });
    }

    Ok(ConnectionPlan {
      project_dir,
      user_home: self.user_home,
      daemon_base_dir: self.daemon_base_dir,
      daemon_idle_timeout: self.daemon_idle_timeout,
      search_upwards: self.search_upwards,
      distribution: self.distribution,
    })
  }
}
