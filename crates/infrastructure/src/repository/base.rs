//! Base repository traits.
//!
//! `Storable` binds a domain entity to its SeaORM table; `EntityRepository`
//! is the CRUD contract every repository exposes for such an entity.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, EntityTrait, FromQueryResult, IntoActiveModel,
    ModelTrait,
};
use uuid::Uuid;

use common::AppResult;
use domain::Identifiable;

use crate::query::Predicate;

/// A domain entity that can be persisted through SeaORM.
pub trait Storable: Identifiable + Clone + Send + Sync + 'static {
    type Entity: EntityTrait<Model = Self::Model>;
    type Model: ModelTrait<Entity = Self::Entity>
        + FromQueryResult
        + IntoActiveModel<Self::ActiveModel>
        + Send
        + Sync
        + 'static;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send + 'static;

    /// Column holding the identifier
    fn id_column() -> <Self::Entity as EntityTrait>::Column;

    /// Convert a row into the domain entity
    fn from_model(model: Self::Model) -> Self;

    /// Active model with every column set, so writes overwrite the whole row
    fn to_active_model(&self) -> Self::ActiveModel;
}

/// CRUD contract over entities of one type.
///
/// Every mutation is its own unit of work: the change is staged and
/// committed before the call returns.
#[async_trait]
pub trait EntityRepository<T>: Send
where
    T: Identifiable + Send + Sync + 'static,
{
    /// Insert a new entity
    async fn create(&mut self, entity: T) -> AppResult<T>;

    /// Delete the record identified by the entity, attaching it first if needed
    async fn delete(&mut self, entity: T) -> AppResult<()>;

    /// Delete by identifier, `NotFound` if there is no such record
    async fn delete_by_id(&mut self, id: Uuid) -> AppResult<()>;

    /// Overwrite every field of an existing record
    async fn update(&mut self, entity: T) -> AppResult<T>;

    /// Every stored entity, in no particular order
    async fn get_all(&mut self) -> AppResult<Vec<T>>;

    /// Entities matching the predicate
    async fn get_where(&mut self, predicate: &Predicate) -> AppResult<Vec<T>>;

    /// Entity by identifier, `None` if absent
    async fn get_by_id(&mut self, id: Uuid) -> AppResult<Option<T>>;

    /// Number of stored entities
    async fn count(&mut self) -> AppResult<u64>;

    /// Release the persistence context
    async fn release(&mut self) -> AppResult<()>;
}
