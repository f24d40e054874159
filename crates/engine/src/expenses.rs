//! Expense primitives.
//!
//! An `Expense` is a single dated outlay attributed to one budget and one
//! category. Tags are stored as a JSON array in a text column.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub owner_id: String,
    pub budget_id: Uuid,
    pub category_id: Uuid,
    pub amount_minor: i64,
    pub description: String,
    pub date: DateTime<Utc>,
    pub tags: Vec<String>,
}

impl Expense {
    pub fn new(
        owner_id: String,
        budget_id: Uuid,
        category_id: Uuid,
        amount_minor: i64,
        description: Option<String>,
        date: Option<DateTime<Utc>>,
        tags: Vec<String>,
    ) -> ResultEngine<Self> {
        if amount_minor < 0 {
            return Err(EngineError::Validation(
                "amount_minor must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            owner_id,
            budget_id,
            category_id,
            amount_minor,
            description: description.unwrap_or_default(),
            date: date.unwrap_or_else(Utc::now),
            tags,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: String,
    pub budget_id: Uuid,
    pub category_id: Uuid,
    pub amount_minor: i64,
    pub description: String,
    pub date: DateTimeUtc,
    pub tags: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id),
            owner_id: ActiveValue::Set(expense.owner_id.clone()),
            budget_id: ActiveValue::Set(expense.budget_id),
            category_id: ActiveValue::Set(expense.category_id),
            amount_minor: ActiveValue::Set(expense.amount_minor),
            description: ActiveValue::Set(expense.description.clone()),
            date: ActiveValue::Set(expense.date),
            tags: ActiveValue::Set(
                serde_json::to_string(&expense.tags).unwrap_or_else(|_| "[]".to_string()),
            ),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            owner_id: model.owner_id,
            budget_id: model.budget_id,
            category_id: model.category_id,
            amount_minor: model.amount_minor,
            description: model.description,
            date: model.date,
            tags: serde_json::from_str(&model.tags).unwrap_or_default(),
        })
    }
}
