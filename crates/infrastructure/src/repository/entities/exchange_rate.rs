//! Exchange rate database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::ExchangeRate;

use crate::repository::Storable;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exchange_rates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Currency pair, e.g. "USD-EUR"
    pub name: String,
    pub rate: f64,
    pub provider: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for ExchangeRate {
    fn from(model: Model) -> Self {
        ExchangeRate {
            id: model.id,
            name: model.name,
            rate: model.rate,
            provider: model.provider,
        }
    }
}

impl Storable for ExchangeRate {
    type Entity = Entity;
    type Model = Model;
    type ActiveModel = ActiveModel;

    fn id_column() -> Column {
        Column::Id
    }

    fn from_model(model: Model) -> Self {
        model.into()
    }

    fn to_active_model(&self) -> ActiveModel {
        ActiveModel {
            id: Set(self.id),
            name: Set(self.name.clone()),
            rate: Set(self.rate),
            provider: Set(self.provider.clone()),
        }
    }
}
