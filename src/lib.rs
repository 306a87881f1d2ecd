//! In-memory meeting-room reservations for a single office building.
//!
//! [`Directory`] owns users and organizations, [`SpaceRegistry`] owns floors
//! and rooms, and [`BookingEngine`] owns reservations, their per-user and
//! per-organization indexes, and the monthly usage quota.

pub mod auth;
pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod limits;
pub mod model;
pub mod observability;
pub mod space;

pub use config::BookingPolicy;
pub use directory::Directory;
pub use engine::BookingEngine;
pub use error::{Entity, Error, Result};
pub use space::SpaceRegistry;
