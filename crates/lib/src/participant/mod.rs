//! Participant builds.
//!
//! - [`types`] - Participant configuration, distribution selection and idle timeouts
//! - [`connector`] - Connection construction and project identity minting

pub mod connector;
mod types;

pub use connector::ParticipantConnector;
pub use types::*;
