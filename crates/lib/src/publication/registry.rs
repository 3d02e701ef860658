//! Composite-wide publication registry.
//!
//! Maps each published coordinate to the single project that produces it. Registration is a
//! check-and-insert under one write lock: a coordinate is either absent, or mapped to the project
//! that will own it for the rest of the session. Registering the same coordinate for a second,
//! different project fails instead of shadowing the first.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::debug;

use super::{ModuleCoordinate, PublicationIdentity};
use crate::identity::ProjectIdentity;

/// Two distinct projects claim the same coordinate.
#[derive(Debug, Clone, Error)]
#[error("coordinate '{publication}' is published by both {existing} and {conflicting}")]
pub struct CollisionError {
  pub publication: PublicationIdentity,
  pub existing: ProjectIdentity,
  pub conflicting: ProjectIdentity,
}

#[derive(Debug, Default)]
pub struct PublicationRegistry {
  entries: RwLock<HashMap<PublicationIdentity, ProjectIdentity>>,
}

impl PublicationRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record that `project` publishes `publication`.
  ///
  /// Re-registering under an equal project is a no-op.
  pub fn register(&self, project: ProjectIdentity, publication: PublicationIdentity) -> Result<(), CollisionError> {
    let mut entries = self.entries.write();
    match entries.entry(publication) {
      Entry::Occupied(existing) => {
        if *existing.get() == project {
          return Ok(());
        }
        Err(CollisionError {
          publication: existing.key().clone(),
          existing: existing.get().clone(),
          conflicting: project,
        })
      }
      Entry::Vacant(slot) => {
        debug!(coordinate = %slot.key(), project = %project, "registered publication");
        slot.insert(project);
        Ok(())
      }
    }
  }

  /// The project publishing `coordinate`, if any participant does.
  pub fn lookup(&self, coordinate: &ModuleCoordinate) -> Option<ProjectIdentity> {
    self.entries.read().get(coordinate).cloned()
  }

  pub fn len(&self) -> usize {
    self.entries.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.read().is_empty()
  }

  /// Snapshot of all registrations, ordered by coordinate.
  pub fn entries(&self) -> Vec<(PublicationIdentity, ProjectIdentity)> {
    let mut entries: Vec<_> = self
      .entries
      .read()
      .iter()
      .map(|(publication, project)| (publication.clone(), project.clone()))
      .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::identity::BuildIdentity;
  use std::sync::Arc;

  fn publication(s: &str) -> PublicationIdentity {
    PublicationIdentity::new(s.parse().unwrap())
  }

  #[test]
  fn lookup_returns_registered_project() {
    let build = BuildIdentity::new("a", "/repoA");
    let registry = PublicationRegistry::new();
    let core = ProjectIdentity::new(build, ":core");

    registry.register(core.clone(), publication("com.acme:core:1.0")).unwrap();

    assert_eq!(registry.lookup(&"com.acme:core:1.0".parse().unwrap()), Some(core));
    assert_eq!(registry.lookup(&"com.acme:missing:1.0".parse().unwrap()), None);
  }

  #[test]
  fn same_project_registration_is_idempotent() {
    let build = BuildIdentity::new("a", "/repoA");
    let registry = PublicationRegistry::new();

    registry
      .register(ProjectIdentity::new(build.clone(), ":lib"), publication("com.acme:lib:1.0"))
      .unwrap();
    registry
      .register(ProjectIdentity::new(build, ":lib"), publication("com.acme:lib:1.0"))
      .unwrap();

    assert_eq!(registry.len(), 1);
  }

  #[test]
  fn different_project_registration_collides() {
    let a = ProjectIdentity::new(BuildIdentity::new("a", "/repoA"), ":lib");
    let b = ProjectIdentity::new(BuildIdentity::new("b", "/repoB"), ":lib");
    let registry = PublicationRegistry::new();

    registry.register(a.clone(), publication("com.acme:lib:1.0")).unwrap();
    let err = registry.register(b.clone(), publication("com.acme:lib:1.0")).unwrap_err();

    assert_eq!(err.existing, a);
    assert_eq!(err.conflicting, b);
    // First registration is kept.
    assert_eq!(registry.lookup(&"com.acme:lib:1.0".parse().unwrap()), Some(a));
  }

  #[test]
  fn distinct_coordinates_coexist() {
    let build = BuildIdentity::new("a", "/repoA");
    let registry = PublicationRegistry::new();

    registry
      .register(ProjectIdentity::new(build.clone(), ":lib"), publication("com.acme:lib:1.0"))
      .unwrap();
    registry
      .register(ProjectIdentity::new(build, ":lib"), publication("com.acme:lib:2.0"))
      .unwrap();

    let coordinates: Vec<String> = registry.entries().iter().map(|(p, _)| p.to_string()).collect();
    assert_eq!(coordinates, vec!["com.acme:lib:1.0", "com.acme:lib:2.0"]);
  }

  #[test]
  fn concurrent_registration_admits_exactly_one_owner() {
    let registry = Arc::new(PublicationRegistry::new());
    let builds: Vec<_> = (0..8)
      .map(|i| BuildIdentity::new(format!("b{i}"), format!("/repo{i}")))
      .collect();

    let handles: Vec<_> = builds
      .iter()
      .cloned()
      .map(|build| {
        let registry = registry.clone();
        std::thread::spawn(move || {
          registry
            .register(ProjectIdentity::new(build, ":lib"), publication("com.acme:lib:1.0"))
            .is_ok()
        })
      })
      .collect();

    let winners = handles.into_iter().map(|h| h.join().unwrap()).filter(|ok| *ok).count();
    assert_eq!(winners, 1);
    assert_eq!(registry.len(), 1);
  }
}
