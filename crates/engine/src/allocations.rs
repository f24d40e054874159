//! Per-budget category allocations.
//!
//! One row per `(budget_id, category_id)` pair. `spent_minor` is the
//! denormalized running total the ledger keeps in sync with the expense
//! table; it is never recomputed on read.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAllocation {
    pub category_id: Uuid,
    pub allocated_minor: i64,
    pub spent_minor: i64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budget_categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub budget_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub category_id: Uuid,
    pub allocated_minor: i64,
    pub spent_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::budgets::Entity",
        from = "Column::BudgetId",
        to = "super::budgets::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Budget,
}

impl Related<super::budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budget.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CategoryAllocation {
    fn from(model: Model) -> Self {
        Self {
            category_id: model.category_id,
            allocated_minor: model.allocated_minor,
            spent_minor: model.spent_minor,
        }
    }
}

impl CategoryAllocation {
    pub fn active_model(&self, budget_id: Uuid) -> ActiveModel {
        ActiveModel {
            budget_id: ActiveValue::Set(budget_id),
            category_id: ActiveValue::Set(self.category_id),
            allocated_minor: ActiveValue::Set(self.allocated_minor),
            spent_minor: ActiveValue::Set(self.spent_minor),
        }
    }
}
