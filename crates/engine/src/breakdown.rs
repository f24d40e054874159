//! Derived spend-by-category totals.
//!
//! This is the display-side aggregation: it re-derives category totals from
//! the raw expense list instead of trusting the denormalized `spent_minor`
//! accumulator. It is a pure function over its input and never writes back,
//! so recomputing it any number of times yields identical results.
//!
//! The accumulator in `budget_categories` stays the authoritative value for
//! allocation views; this breakdown exists for clients that want totals
//! derived from the expenses they just fetched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::expenses::Expense;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
    pub category_id: Uuid,
    pub spent_minor: i64,
    /// Share of total spend, in percent. `0.0` when total spend is zero.
    pub share_pct: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpendingBreakdown {
    pub total_spent_minor: i64,
    pub categories: Vec<CategorySpend>,
}

/// Group expenses by category and compute each group's share of the total.
///
/// Entries are ordered by category id so the output is deterministic.
pub fn spending_breakdown(expenses: &[Expense]) -> SpendingBreakdown {
    let mut by_category: BTreeMap<Uuid, i64> = BTreeMap::new();
    for expense in expenses {
        *by_category.entry(expense.category_id).or_insert(0) += expense.amount_minor;
    }

    let total_spent_minor: i64 = by_category.values().sum();
    let categories = by_category
        .into_iter()
        .map(|(category_id, spent_minor)| CategorySpend {
            category_id,
            spent_minor,
            share_pct: if total_spent_minor == 0 {
                0.0
            } else {
                spent_minor as f64 * 100.0 / total_spent_minor as f64
            },
        })
        .collect();

    SpendingBreakdown {
        total_spent_minor,
        categories,
    }
}
