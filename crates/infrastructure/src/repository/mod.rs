//! Repository layer for data access.

mod base;
pub mod entities;
mod entity_repository;

pub use base::{EntityRepository, Storable};
pub use entity_repository::Repository;
