//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::BudgetPeriod;

/// Create a budget. Allocations always start empty.
#[derive(Clone, Debug)]
pub struct BudgetNewCmd {
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub total_minor: i64,
    pub period: Option<BudgetPeriod>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Patch an existing budget. `None` fields are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct BudgetUpdateCmd {
    pub name: Option<String>,
    pub description: Option<String>,
    pub total_minor: Option<i64>,
    pub period: Option<BudgetPeriod>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Attach a category allocation to a budget.
#[derive(Clone, Debug)]
pub struct CategoryAttachCmd {
    pub budget_id: Uuid,
    pub category_id: Uuid,
    pub allocated_minor: i64,
    pub user_id: String,
}

/// Create a category.
#[derive(Clone, Debug)]
pub struct CategoryNewCmd {
    pub user_id: String,
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

/// Patch an existing category. `None` fields are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct CategoryUpdateCmd {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

/// Create an expense against a budget + category pair.
#[derive(Clone, Debug)]
pub struct ExpenseNewCmd {
    pub user_id: String,
    pub budget_id: Uuid,
    pub category_id: Uuid,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

impl ExpenseNewCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        budget_id: Uuid,
        category_id: Uuid,
        amount_minor: i64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            budget_id,
            category_id,
            amount_minor,
            description: None,
            date: None,
            tags: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// Patch an existing expense. `None` fields are left unchanged.
///
/// There is deliberately no `budget_id` field: moving an expense between
/// budgets is not supported, only category reassignment within the same
/// budget.
#[derive(Clone, Debug, Default)]
pub struct ExpenseUpdateCmd {
    pub amount_minor: Option<i64>,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
}

/// Filters for listing expenses. The owner is always implied.
#[derive(Clone, Debug, Default)]
pub struct ExpenseListFilter {
    pub budget_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}
