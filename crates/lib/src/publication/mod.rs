//! Publications and the composite-wide publication registry.
//!
//! - [`types`] - Module coordinates and publication identities
//! - [`registry`] - Coordinate to project lookup used for dependency substitution

pub mod registry;
mod types;

pub use registry::{CollisionError, PublicationRegistry};
pub use types::*;
