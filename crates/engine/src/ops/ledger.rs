//! Ledger reconciliation: keeps `budget_categories.spent_minor` equal to the
//! sum of expense amounts for the pair `(budget_id, category_id)`.
//!
//! Adjustments are single atomic UPDATE statements keyed by the pair, so two
//! concurrent expense writes against the same allocation both land instead
//! of one overwriting the other. A pair with no allocation row matches zero
//! rows and the adjustment is silently skipped: an expense write never fails
//! because the category was detached or never attached. `recompute_spent`
//! is the corrective path for the drift that skips can accumulate.

use sea_orm::{ConnectionTrait, DatabaseTransaction, QueryFilter, Statement, prelude::*};
use uuid::Uuid;

use crate::{ResultEngine, allocations};

use super::Engine;

impl Engine {
    /// Add an expense amount to the allocation's running total.
    pub(super) async fn credit_allocation(
        &self,
        db: &DatabaseTransaction,
        budget_id: Uuid,
        category_id: Uuid,
        amount_minor: i64,
    ) -> ResultEngine<()> {
        let backend = db.get_database_backend();
        let result = db
            .execute(Statement::from_sql_and_values(
                backend,
                "UPDATE budget_categories \
                 SET spent_minor = spent_minor + ? \
                 WHERE budget_id = ? AND category_id = ?",
                [amount_minor.into(), budget_id.into(), category_id.into()],
            ))
            .await?;

        if result.rows_affected() == 0 {
            tracing_skip(budget_id, category_id, "credit");
        }
        Ok(())
    }

    /// Remove an expense amount from the allocation's running total,
    /// floored at zero so stale data can never drive the total negative.
    pub(super) async fn debit_allocation(
        &self,
        db: &DatabaseTransaction,
        budget_id: Uuid,
        category_id: Uuid,
        amount_minor: i64,
    ) -> ResultEngine<()> {
        let backend = db.get_database_backend();
        let result = db
            .execute(Statement::from_sql_and_values(
                backend,
                "UPDATE budget_categories \
                 SET spent_minor = MAX(0, spent_minor - ?) \
                 WHERE budget_id = ? AND category_id = ?",
                [amount_minor.into(), budget_id.into(), category_id.into()],
            ))
            .await?;

        if result.rows_affected() == 0 {
            tracing_skip(budget_id, category_id, "debit");
        }
        Ok(())
    }

    /// Move spend between two allocations of the same budget.
    ///
    /// The debit of the old pair happens before the credit of the new pair;
    /// both run in the caller's transaction so the budget is persisted once.
    pub(super) async fn move_allocation_spend(
        &self,
        db: &DatabaseTransaction,
        budget_id: Uuid,
        old_category_id: Uuid,
        old_amount_minor: i64,
        new_category_id: Uuid,
        new_amount_minor: i64,
    ) -> ResultEngine<()> {
        self.debit_allocation(db, budget_id, old_category_id, old_amount_minor)
            .await?;
        self.credit_allocation(db, budget_id, new_category_id, new_amount_minor)
            .await
    }

    /// Recompute every allocation total of a budget from the expense table.
    ///
    /// This is the recovery path for drift left behind by silent skips
    /// (category detached while expenses existed, allocation attached after
    /// the fact).
    pub(super) async fn recompute_allocations(
        &self,
        db: &DatabaseTransaction,
        budget_id: Uuid,
    ) -> ResultEngine<()> {
        let backend = db.get_database_backend();
        let allocation_models: Vec<allocations::Model> = allocations::Entity::find()
            .filter(allocations::Column::BudgetId.eq(budget_id))
            .all(db)
            .await?;

        for allocation in allocation_models {
            let row = db
                .query_one(Statement::from_sql_and_values(
                    backend,
                    "SELECT COALESCE(SUM(amount_minor), 0) AS sum \
                     FROM expenses \
                     WHERE budget_id = ? AND category_id = ?",
                    [budget_id.into(), allocation.category_id.into()],
                ))
                .await?;
            let sum: i64 = row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0);

            db.execute(Statement::from_sql_and_values(
                backend,
                "UPDATE budget_categories \
                 SET spent_minor = ? \
                 WHERE budget_id = ? AND category_id = ?",
                [sum.into(), budget_id.into(), allocation.category_id.into()],
            ))
            .await?;
        }

        Ok(())
    }
}

fn tracing_skip(budget_id: Uuid, category_id: Uuid, op: &str) {
    tracing::debug!(
        %budget_id,
        %category_id,
        op,
        "no allocation for category, skipping spent adjustment"
    );
}
