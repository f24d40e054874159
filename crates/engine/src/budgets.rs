//! Budget primitives.
//!
//! A `Budget` is a time-bounded spending plan with a total allowance and a
//! list of per-category allocations. The allocation list lives in its own
//! table (`budget_categories`) and is loaded alongside the budget row.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, allocations::CategoryAllocation, expenses::Expense};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPeriod {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl BudgetPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }
}

impl TryFrom<&str> for BudgetPeriod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            other => Err(EngineError::Validation(format!(
                "invalid budget period: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub description: String,
    pub total_minor: i64,
    pub period: BudgetPeriod,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub categories: Vec<CategoryAllocation>,
    pub expenses: Vec<Expense>,
}

impl Budget {
    /// Budgets always start with an empty allocation list; categories are
    /// attached later through a dedicated operation.
    pub fn new(
        owner_id: String,
        name: String,
        description: Option<String>,
        total_minor: i64,
        period: BudgetPeriod,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if total_minor < 0 {
            return Err(EngineError::Validation(
                "total_minor must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            owner_id,
            name,
            description: description.unwrap_or_default(),
            total_minor,
            period,
            start_date,
            end_date,
            categories: Vec::new(),
            expenses: Vec::new(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub description: String,
    pub total_minor: i64,
    pub period: String,
    pub start_date: DateTimeUtc,
    pub end_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::allocations::Entity")]
    Allocations,
}

impl Related<super::allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Allocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(budget: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(budget.id),
            owner_id: ActiveValue::Set(budget.owner_id.clone()),
            name: ActiveValue::Set(budget.name.clone()),
            description: ActiveValue::Set(budget.description.clone()),
            total_minor: ActiveValue::Set(budget.total_minor),
            period: ActiveValue::Set(budget.period.as_str().to_string()),
            start_date: ActiveValue::Set(budget.start_date),
            end_date: ActiveValue::Set(budget.end_date),
        }
    }
}

impl TryFrom<Model> for Budget {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            owner_id: model.owner_id,
            name: model.name,
            description: model.description,
            total_minor: model.total_minor,
            period: BudgetPeriod::try_from(model.period.as_str())?,
            start_date: model.start_date,
            end_date: model.end_date,
            categories: Vec::new(),
            expenses: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_round_trips() {
        for period in [
            BudgetPeriod::Monthly,
            BudgetPeriod::Quarterly,
            BudgetPeriod::Yearly,
        ] {
            assert_eq!(BudgetPeriod::try_from(period.as_str()).unwrap(), period);
        }
    }

    #[test]
    fn unknown_period_rejected() {
        assert!(BudgetPeriod::try_from("weekly").is_err());
    }

    #[test]
    fn negative_total_rejected() {
        let err = Budget::new(
            "alice".to_string(),
            "Groceries".to_string(),
            None,
            -1,
            BudgetPeriod::Monthly,
            Utc::now(),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}
