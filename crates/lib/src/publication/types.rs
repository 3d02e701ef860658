//! Module coordinates and publication identities.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parsing a `group:name:version` coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateParseError {
  #[error("invalid module coordinate '{0}': expected 'group:name:version'")]
  Format(String),

  #[error("invalid module coordinate '{input}': {part} is empty")]
  EmptyPart { input: String, part: &'static str },
}

/// A published module coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleCoordinate {
  group: String,
  name: String,
  version: String,
}

impl ModuleCoordinate {
  pub fn new(
    group: impl Into<String>,
    name: impl Into<String>,
    version: impl Into<String>,
  ) -> Result<Self, CoordinateParseError> {
    let coordinate = Self {
      group: group.into(),
      name: name.into(),
      version: version.into(),
    };
    coordinate.validate()?;
    Ok(coordinate)
  }

  pub fn group(&self) -> &str {
    &self.group
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn version(&self) -> &str {
    &self.version
  }

  fn validate(&self) -> Result<(), CoordinateParseError> {
    for (part, value) in [("group", &self.group), ("name", &self.name), ("version", &self.version)] {
      if value.is_empty() {
        return Err(CoordinateParseError::EmptyPart {
          input: self.to_string(),
          part,
        });
      }
      if value.contains(':') {
        return Err(CoordinateParseError::Format(self.to_string()));
      }
    }
    Ok(())
  }
}

impl FromStr for ModuleCoordinate {
  type Err = CoordinateParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let mut parts = s.split(':');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
      (Some(group), Some(name), Some(version), None) => Self::new(group, name, version).map_err(|e| match e {
        CoordinateParseError::EmptyPart { part, .. } => CoordinateParseError::EmptyPart {
          input: s.to_string(),
          part,
        },
        other => other,
      }),
      _ => Err(CoordinateParseError::Format(s.to_string())),
    }
  }
}

impl TryFrom<String> for ModuleCoordinate {
  type Error = CoordinateParseError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<ModuleCoordinate> for String {
  fn from(value: ModuleCoordinate) -> Self {
    value.to_string()
  }
}

impl fmt::Display for ModuleCoordinate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}:{}", self.group, self.name, self.version)
  }
}

/// "This project publishes coordinate X".
///
/// Equality and hash come from the coordinate alone, so two publications of the same coordinate
/// deduplicate no matter where they were discovered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicationIdentity {
  coordinate: ModuleCoordinate,
}

impl PublicationIdentity {
  pub fn new(coordinate: ModuleCoordinate) -> Self {
    Self { coordinate }
  }

  pub fn coordinate(&self) -> &ModuleCoordinate {
    &self.coordinate
  }
}

// Hash of a single-field struct equals the field's hash, which keeps map lookups by coordinate sound.
impl Borrow<ModuleCoordinate> for PublicationIdentity {
  fn borrow(&self) -> &ModuleCoordinate {
    &self.coordinate
  }
}

impl From<ModuleCoordinate> for PublicationIdentity {
  fn from(coordinate: ModuleCoordinate) -> Self {
    Self::new(coordinate)
  }
}

impl fmt::Display for PublicationIdentity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.coordinate.fmt(f)
  }
}
