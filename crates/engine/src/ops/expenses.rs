//! Expense operations.
//!
//! Every write reconciles the owning budget's allocation totals in the same
//! transaction: create credits the pair, delete debits it, update debits the
//! old state before crediting the new one.

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Expense, ExpenseListFilter, ExpenseNewCmd, ExpenseUpdateCmd, ResultEngine, expenses,
    util::validate_amount,
};

use super::{Engine, with_tx};

impl Engine {
    /// Create an expense against an owned budget.
    ///
    /// The category does not have to be attached to the budget: in that case
    /// the expense is stored and the allocation adjustment is skipped.
    pub async fn create_expense(&self, cmd: ExpenseNewCmd) -> ResultEngine<Expense> {
        validate_amount(cmd.amount_minor, "amount_minor")?;
        let expense = Expense::new(
            cmd.user_id.clone(),
            cmd.budget_id,
            cmd.category_id,
            cmd.amount_minor,
            cmd.description,
            cmd.date,
            cmd.tags,
        )?;

        with_tx!(self, |db_tx| {
            self.require_budget_owned(&db_tx, cmd.budget_id, &cmd.user_id)
                .await?;

            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;
            self.credit_allocation(&db_tx, expense.budget_id, expense.category_id, expense.amount_minor)
                .await?;

            Ok(expense)
        })
    }

    /// Patch an expense, reconciling allocations when the amount or the
    /// category changed. Budget reassignment is not supported.
    pub async fn update_expense(
        &self,
        expense_id: Uuid,
        user_id: &str,
        cmd: ExpenseUpdateCmd,
    ) -> ResultEngine<Expense> {
        if let Some(amount_minor) = cmd.amount_minor {
            validate_amount(amount_minor, "amount_minor")?;
        }

        with_tx!(self, |db_tx| {
            let model = self.require_expense_owned(&db_tx, expense_id, user_id).await?;

            let old_amount_minor = model.amount_minor;
            let old_category_id = model.category_id;
            let budget_id = model.budget_id;

            let new_amount_minor = cmd.amount_minor.unwrap_or(old_amount_minor);
            let new_category_id = cmd.category_id.unwrap_or(old_category_id);

            let mut active: expenses::ActiveModel = model.into();
            active.amount_minor = ActiveValue::Set(new_amount_minor);
            active.category_id = ActiveValue::Set(new_category_id);
            if let Some(description) = cmd.description {
                active.description = ActiveValue::Set(description);
            }
            if let Some(date) = cmd.date {
                active.date = ActiveValue::Set(date);
            }
            if let Some(tags) = cmd.tags {
                active.tags = ActiveValue::Set(
                    serde_json::to_string(&tags).unwrap_or_else(|_| "[]".to_string()),
                );
            }
            let updated = active.update(&db_tx).await?;

            if new_amount_minor != old_amount_minor || new_category_id != old_category_id {
                self.move_allocation_spend(
                    &db_tx,
                    budget_id,
                    old_category_id,
                    old_amount_minor,
                    new_category_id,
                    new_amount_minor,
                )
                .await?;
            }

            Expense::try_from(updated)
        })
    }

    /// Delete an expense and debit its allocation.
    pub async fn delete_expense(&self, expense_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_expense_owned(&db_tx, expense_id, user_id).await?;

            self.debit_allocation(&db_tx, model.budget_id, model.category_id, model.amount_minor)
                .await?;
            model.delete(&db_tx).await?;

            Ok(())
        })
    }

    /// Return a single owned expense.
    pub async fn expense(&self, expense_id: Uuid, user_id: &str) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            let model = self.require_expense_owned(&db_tx, expense_id, user_id).await?;
            Expense::try_from(model)
        })
    }

    /// List the requester's expenses, newest first, optionally narrowed to a
    /// budget and/or a category.
    pub async fn list_expenses(
        &self,
        user_id: &str,
        filter: &ExpenseListFilter,
    ) -> ResultEngine<Vec<Expense>> {
        let mut query = expenses::Entity::find()
            .filter(expenses::Column::OwnerId.eq(user_id))
            .order_by_desc(expenses::Column::Date);

        if let Some(budget_id) = filter.budget_id {
            query = query.filter(expenses::Column::BudgetId.eq(budget_id));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(expenses::Column::CategoryId.eq(category_id));
        }

        let models = query.all(&self.database).await?;
        models.into_iter().map(Expense::try_from).collect()
    }

    pub(super) async fn expenses_for_budget(
        &self,
        db: &sea_orm::DatabaseTransaction,
        budget_id: Uuid,
    ) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::BudgetId.eq(budget_id))
            .order_by_desc(expenses::Column::Date)
            .all(db)
            .await?;
        models.into_iter().map(Expense::try_from).collect()
    }
}
