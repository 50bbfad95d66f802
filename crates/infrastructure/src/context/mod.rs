//! Persistence context - owns the connection and commits staged changes.
//!
//! A context is exclusively owned by one repository. Each call to
//! `save_changes` is one database transaction: either every staged entry is
//! written or none is.

mod tracker;

pub use tracker::{EntitySet, EntityState};

use common::{AppError, AppResult, DatabaseConfig};
use domain::Identifiable;
use sea_orm::{DatabaseConnection, DatabaseTransaction, EntityTrait, TransactionTrait};
use tracing::{debug, error, info};

use crate::infra::Database;
use crate::repository::Storable;

/// Unit of work over one database connection.
pub struct DbContext {
    connection: Option<DatabaseConnection>,
}

impl DbContext {
    /// Take ownership of a connection.
    ///
    /// Releasing the context closes the connection pool, including any
    /// clones of it held elsewhere.
    pub fn new(connection: DatabaseConnection) -> Self {
        Self {
            connection: Some(connection),
        }
    }

    /// Open a dedicated connection for this context.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let db = Database::connect(config).await?;
        Ok(Self::new(db.into_connection()))
    }

    /// Connection for queries, unless the context has been released.
    pub fn connection(&self) -> AppResult<&DatabaseConnection> {
        self.connection.as_ref().ok_or(AppError::ResourceDisposed)
    }

    /// Flush every staged entry of `set` in a single transaction.
    ///
    /// Returns the number of rows written. On failure the transaction is
    /// rolled back and the staged entries are detached.
    pub async fn save_changes<T: Storable>(&self, set: &mut EntitySet<T>) -> AppResult<usize> {
        let connection = match self.connection() {
            Ok(connection) => connection,
            Err(e) => {
                set.discard_changes();
                return Err(e);
            }
        };

        if !set.has_changes() {
            return Ok(0);
        }

        let txn = match connection.begin().await {
            Ok(txn) => txn,
            Err(e) => {
                set.discard_changes();
                return Err(e.into());
            }
        };

        match write_pending(&txn, set).await {
            Ok(written) => {
                if let Err(e) = txn.commit().await {
                    set.discard_changes();
                    return Err(e.into());
                }
                set.accept_changes();
                debug!(written, "Committed unit of work");
                Ok(written)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    error!("Transaction rollback failed: {}", rollback_err);
                }
                set.discard_changes();
                Err(e)
            }
        }
    }

    /// Close the connection. Calling this again is a no-op.
    pub async fn release(&mut self) -> AppResult<()> {
        if let Some(connection) = self.connection.take() {
            connection.close().await?;
            info!("Persistence context released");
        }
        Ok(())
    }
}

impl Drop for DbContext {
    fn drop(&mut self) {
        if self.connection.take().is_some() {
            debug!("Persistence context dropped without release, closing connection");
        }
    }
}

async fn write_pending<T: Storable>(txn: &DatabaseTransaction, set: &EntitySet<T>) -> AppResult<usize> {
    let mut written = 0;

    for (state, entity) in set.pending() {
        match state {
            EntityState::Added => {
                <T::Entity as EntityTrait>::insert(entity.to_active_model())
                    .exec_without_returning(txn)
                    .await?;
            }
            EntityState::Modified => {
                <T::Entity as EntityTrait>::update(entity.to_active_model())
                    .exec(txn)
                    .await?;
            }
            EntityState::Removed => {
                let result = <T::Entity as EntityTrait>::delete(entity.to_active_model())
                    .exec(txn)
                    .await?;

                if result.rows_affected == 0 {
                    return Err(AppError::store_conflict(format!(
                        "no record with id {} to delete",
                        entity.id()
                    )));
                }
            }
            EntityState::Unchanged | EntityState::Detached => continue,
        }
        written += 1;
    }

    Ok(written)
}
