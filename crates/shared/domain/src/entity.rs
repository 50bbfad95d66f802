//! Base contract for persisted entities.

use uuid::Uuid;

/// Anything that can be stored by a repository.
///
/// The identifier is the only attribute a repository relies on; every other
/// field is opaque to it. Implementors must never change the value returned
/// by `id()` once the entity has been created.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Generate a fresh random identifier for a new entity.
pub fn new_id() -> Uuid {
    Uuid::new_v4()
}
