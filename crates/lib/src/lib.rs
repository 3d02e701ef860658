//! weave-lib: composite build participants and cross-build project identity
//!
//! This crate provides the pieces an orchestrator needs to treat several independently rooted
//! builds as one composite session:
//! - `ParticipantConfig` / `ParticipantConnector`: per-participant engine connection settings
//! - `BuildIdentity` / `ProjectIdentity`: identities of participant builds and their projects
//! - `PublicationRegistry`: which project publishes a module coordinate
//! - `CompositeCoordinator`: the session aggregate tying these together

pub mod composite;
pub mod config;
pub mod consts;
pub mod engine;
pub mod identity;
pub mod participant;
pub mod platform;
pub mod publication;
