//! Budget operations.
//!
//! Budgets are returned with their allocation list and their expenses
//! attached, matching what clients render. Deleting a budget is the only
//! cascade in the system: its expenses go with it.

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Budget, BudgetNewCmd, BudgetUpdateCmd, CategoryAllocation, CategoryAttachCmd, EngineError,
    ResultEngine, allocations, budgets, expenses,
    util::{normalize_display_name, validate_amount},
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a budget with an empty allocation list.
    pub async fn create_budget(&self, cmd: BudgetNewCmd) -> ResultEngine<Budget> {
        let name = normalize_display_name(&cmd.name, "budget")?;
        validate_amount(cmd.total_minor, "total_minor")?;
        let budget = Budget::new(
            cmd.user_id,
            name,
            cmd.description,
            cmd.total_minor,
            cmd.period.unwrap_or_default(),
            cmd.start_date,
            cmd.end_date,
        )?;

        budgets::ActiveModel::from(&budget)
            .insert(&self.database)
            .await?;
        Ok(budget)
    }

    /// Patch an owned budget. Allocations and expenses are not touched.
    pub async fn update_budget(
        &self,
        budget_id: Uuid,
        user_id: &str,
        cmd: BudgetUpdateCmd,
    ) -> ResultEngine<Budget> {
        let renamed = cmd
            .name
            .as_deref()
            .map(|name| normalize_display_name(name, "budget"))
            .transpose()?;
        if let Some(total_minor) = cmd.total_minor {
            validate_amount(total_minor, "total_minor")?;
        }

        with_tx!(self, |db_tx| {
            let model = self.require_budget_owned(&db_tx, budget_id, user_id).await?;
            let mut active: budgets::ActiveModel = model.into();

            if let Some(name) = renamed {
                active.name = ActiveValue::Set(name);
            }
            if let Some(description) = cmd.description {
                active.description = ActiveValue::Set(description);
            }
            if let Some(total_minor) = cmd.total_minor {
                active.total_minor = ActiveValue::Set(total_minor);
            }
            if let Some(period) = cmd.period {
                active.period = ActiveValue::Set(period.as_str().to_string());
            }
            if let Some(start_date) = cmd.start_date {
                active.start_date = ActiveValue::Set(start_date);
            }
            if let Some(end_date) = cmd.end_date {
                active.end_date = ActiveValue::Set(end_date);
            }

            let updated = active.update(&db_tx).await?;
            self.load_budget(&db_tx, updated).await
        })
    }

    /// Return an owned budget with allocations and expenses attached.
    pub async fn budget(&self, budget_id: Uuid, user_id: &str) -> ResultEngine<Budget> {
        with_tx!(self, |db_tx| {
            let model = self.require_budget_owned(&db_tx, budget_id, user_id).await?;
            self.load_budget(&db_tx, model).await
        })
    }

    /// List the requester's budgets (latest start date first), each with
    /// allocations and expenses attached.
    pub async fn list_budgets(&self, user_id: &str) -> ResultEngine<Vec<Budget>> {
        with_tx!(self, |db_tx| {
            let models = budgets::Entity::find()
                .filter(budgets::Column::OwnerId.eq(user_id))
                .order_by_desc(budgets::Column::StartDate)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(models.len());
            for model in models {
                out.push(self.load_budget(&db_tx, model).await?);
            }
            Ok(out)
        })
    }

    /// Delete an owned budget and every expense recorded against it.
    /// Allocation rows cascade with the budget.
    pub async fn delete_budget(&self, budget_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_budget_owned(&db_tx, budget_id, user_id).await?;

            expenses::Entity::delete_many()
                .filter(expenses::Column::BudgetId.eq(budget_id))
                .exec(&db_tx)
                .await?;
            model.delete(&db_tx).await?;

            Ok(())
        })
    }

    /// Attach a category allocation to an owned budget.
    ///
    /// The category must exist and belong to the requester; attaching the
    /// same category twice is rejected.
    pub async fn add_category_to_budget(&self, cmd: CategoryAttachCmd) -> ResultEngine<Budget> {
        validate_amount(cmd.allocated_minor, "allocated_minor")?;

        with_tx!(self, |db_tx| {
            let model = self
                .require_budget_owned(&db_tx, cmd.budget_id, &cmd.user_id)
                .await?;
            let category = self
                .require_category_owned(&db_tx, cmd.category_id, &cmd.user_id)
                .await?;

            let existing = allocations::Entity::find_by_id((cmd.budget_id, cmd.category_id))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::DuplicateCategory(category.name));
            }

            let allocation = CategoryAllocation {
                category_id: cmd.category_id,
                allocated_minor: cmd.allocated_minor,
                spent_minor: 0,
            };
            allocation.active_model(cmd.budget_id).insert(&db_tx).await?;

            self.load_budget(&db_tx, model).await
        })
    }

    /// Recompute every allocation total of an owned budget from the expense
    /// table and return the repaired budget.
    pub async fn recompute_budget_spent(
        &self,
        budget_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Budget> {
        with_tx!(self, |db_tx| {
            let model = self.require_budget_owned(&db_tx, budget_id, user_id).await?;
            self.recompute_allocations(&db_tx, budget_id).await?;
            self.load_budget(&db_tx, model).await
        })
    }

    /// Derive spend-by-category totals from the raw expense list of an
    /// owned budget. Read-only: never touches the stored accumulators.
    pub async fn budget_breakdown(
        &self,
        budget_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<crate::SpendingBreakdown> {
        with_tx!(self, |db_tx| {
            self.require_budget_owned(&db_tx, budget_id, user_id).await?;
            let expense_list = self.expenses_for_budget(&db_tx, budget_id).await?;
            Ok(crate::spending_breakdown(&expense_list))
        })
    }

    async fn load_budget(
        &self,
        db: &sea_orm::DatabaseTransaction,
        model: budgets::Model,
    ) -> ResultEngine<Budget> {
        let budget_id = model.id;
        let mut budget = Budget::try_from(model)?;

        let allocation_models: Vec<allocations::Model> = allocations::Entity::find()
            .filter(allocations::Column::BudgetId.eq(budget_id))
            .all(db)
            .await?;
        budget.categories = allocation_models
            .into_iter()
            .map(CategoryAllocation::from)
            .collect();
        budget.expenses = self.expenses_for_budget(db, budget_id).await?;

        Ok(budget)
    }
}
