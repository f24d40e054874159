use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response envelope wrapping every successful JSON body.
///
/// Serialized as `{"success": true, "data": ...}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiSuccess<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiSuccess<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Response envelope wrapping every error JSON body.
///
/// Serialized as `{"success": false, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub success: bool,
    pub error: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

pub mod user {
    use super::*;

    /// Profile of the authenticated user.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub username: String,
        pub name: String,
        pub currency: String,
        pub theme: String,
    }

    /// Request body for updating profile settings.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserUpdate {
        pub name: Option<String>,
        pub currency: Option<String>,
        pub theme: Option<String>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        /// Hex color, e.g. `#3b82f6`. Server default applies when absent.
        pub color: Option<String>,
        pub icon: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        pub color: Option<String>,
        pub icon: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub color: String,
        pub icon: String,
    }
}

pub mod budget {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BudgetPeriod {
        #[default]
        Monthly,
        Quarterly,
        Yearly,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub name: String,
        pub description: Option<String>,
        pub total_minor: i64,
        pub period: Option<BudgetPeriod>,
        pub start_date: DateTime<Utc>,
        pub end_date: DateTime<Utc>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
        pub total_minor: Option<i64>,
        pub period: Option<BudgetPeriod>,
        pub start_date: Option<DateTime<Utc>>,
        pub end_date: Option<DateTime<Utc>>,
    }

    /// Request body for attaching a category allocation to a budget.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AllocationNew {
        pub category_id: Uuid,
        pub allocated_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AllocationView {
        pub category_id: Uuid,
        pub allocated_minor: i64,
        /// Server-maintained running total of expenses recorded against
        /// this (budget, category) pair.
        pub spent_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub name: String,
        pub description: String,
        pub total_minor: i64,
        pub period: BudgetPeriod,
        pub start_date: DateTime<Utc>,
        pub end_date: DateTime<Utc>,
        pub categories: Vec<AllocationView>,
        pub expenses: Vec<super::expense::ExpenseView>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub budget_id: Uuid,
        pub category_id: Uuid,
        pub amount_minor: i64,
        pub description: Option<String>,
        /// Defaults to now() when absent.
        pub date: Option<DateTime<Utc>>,
        pub tags: Option<Vec<String>>,
    }

    /// Patch body for an expense. The owning budget cannot be changed.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub category_id: Option<Uuid>,
        pub amount_minor: Option<i64>,
        pub description: Option<String>,
        pub date: Option<DateTime<Utc>>,
        pub tags: Option<Vec<String>>,
    }

    /// Optional filters for listing expenses.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseList {
        pub budget_id: Option<Uuid>,
        pub category_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub budget_id: Uuid,
        pub category_id: Uuid,
        pub amount_minor: i64,
        pub description: String,
        pub date: DateTime<Utc>,
        pub tags: Vec<String>,
    }
}

pub mod report {
    use super::*;

    /// Spend aggregated for one category.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySpend {
        pub category_id: Uuid,
        pub spent_minor: i64,
        /// Share of the budget's total spend, in percent. 0 when the
        /// budget has no spend at all.
        pub share_pct: f64,
    }

    /// Spend-by-category breakdown derived from the raw expense list.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SpendingBreakdown {
        pub total_spent_minor: i64,
        pub categories: Vec<CategorySpend>,
    }
}
