//! Generic repository over any `Storable` entity.

use std::any::type_name;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use tracing::debug;
use uuid::Uuid;

use common::{AppResult, DatabaseConfig, OptionExt};
use domain::Identifiable;

use super::base::{EntityRepository, Storable};
use crate::context::{DbContext, EntitySet, EntityState};
use crate::query::Predicate;

/// Repository backed by an exclusively owned persistence context.
///
/// Reads refresh the tracked set; mutations stage one change and commit it
/// immediately. Every entity read stays tracked until `release()`, so a
/// long-lived repository holding a large table should be released and
/// reopened. The context is released by `release()` or when the repository
/// is dropped.
pub struct Repository<T> {
    context: DbContext,
    set: EntitySet<T>,
}

impl<T: Storable> Repository<T> {
    /// Create a repository over the given context
    pub fn new(context: DbContext) -> Self {
        Self {
            context,
            set: EntitySet::new(),
        }
    }

    /// Create a repository with its own connection
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        Ok(Self::new(DbContext::connect(config).await?))
    }

    /// Tracked state of the entity with this identifier
    pub fn state_of(&self, id: Uuid) -> EntityState {
        self.set.state_of(id)
    }

    /// Number of entities currently tracked
    pub fn tracked_len(&self) -> usize {
        self.set.len()
    }

    /// Release the context and consume the repository
    pub async fn close(mut self) -> AppResult<()> {
        self.release().await
    }

    fn track_all(&mut self, entities: &[T]) {
        for entity in entities {
            self.set.track_unchanged(entity.clone());
        }
    }
}

#[async_trait]
impl<T: Storable> EntityRepository<T> for Repository<T> {
    async fn create(&mut self, entity: T) -> AppResult<T> {
        self.context.connection()?;

        self.set.add(entity.clone());
        self.context.save_changes(&mut self.set).await?;

        debug!(id = %entity.id(), entity = type_name::<T>(), "Created entity");
        Ok(entity)
    }

    async fn delete(&mut self, entity: T) -> AppResult<()> {
        self.context.connection()?;
        let id = entity.id();

        if self.set.state_of(id) == EntityState::Detached {
            self.set.attach(entity.clone());
        }
        self.set.remove(entity);
        self.context.save_changes(&mut self.set).await?;

        debug!(%id, entity = type_name::<T>(), "Deleted entity");
        Ok(())
    }

    async fn delete_by_id(&mut self, id: Uuid) -> AppResult<()> {
        let entity = self.get_by_id(id).await?.ok_or_not_found()?;
        self.delete(entity).await
    }

    async fn update(&mut self, entity: T) -> AppResult<T> {
        self.context.connection()?;

        self.set.mark_modified(entity.clone());
        self.context.save_changes(&mut self.set).await?;

        debug!(id = %entity.id(), entity = type_name::<T>(), "Updated entity");
        Ok(entity)
    }

    async fn get_all(&mut self) -> AppResult<Vec<T>> {
        let models = T::Entity::find().all(self.context.connection()?).await?;

        let entities: Vec<T> = models.into_iter().map(T::from_model).collect();
        self.track_all(&entities);
        Ok(entities)
    }

    async fn get_where(&mut self, predicate: &Predicate) -> AppResult<Vec<T>> {
        let condition = predicate.to_condition::<T::Entity>()?;
        let models = T::Entity::find()
            .filter(condition)
            .all(self.context.connection()?)
            .await?;

        let entities: Vec<T> = models.into_iter().map(T::from_model).collect();
        debug!(matched = entities.len(), entity = type_name::<T>(), "Filtered entities");
        self.track_all(&entities);
        Ok(entities)
    }

    async fn get_by_id(&mut self, id: Uuid) -> AppResult<Option<T>> {
        let model = T::Entity::find()
            .filter(T::id_column().eq(id))
            .one(self.context.connection()?)
            .await?;

        let entity = model.map(T::from_model);
        if let Some(found) = &entity {
            self.set.track_unchanged(found.clone());
        }
        Ok(entity)
    }

    async fn count(&mut self) -> AppResult<u64> {
        let total = T::Entity::find().count(self.context.connection()?).await?;
        Ok(total)
    }

    async fn release(&mut self) -> AppResult<()> {
        self.set.clear();
        self.context.release().await
    }
}
