//! Budget API endpoints

use api_types::{
    ApiSuccess,
    budget::{
        AllocationNew, AllocationView, BudgetNew, BudgetPeriod as ApiPeriod, BudgetUpdate,
        BudgetView,
    },
    report::{CategorySpend, SpendingBreakdown},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, expenses::map_expense, server::ServerState};
use engine::{BudgetNewCmd, BudgetUpdateCmd, CategoryAttachCmd, users};

fn map_period(period: engine::BudgetPeriod) -> ApiPeriod {
    match period {
        engine::BudgetPeriod::Monthly => ApiPeriod::Monthly,
        engine::BudgetPeriod::Quarterly => ApiPeriod::Quarterly,
        engine::BudgetPeriod::Yearly => ApiPeriod::Yearly,
    }
}

fn map_period_in(period: ApiPeriod) -> engine::BudgetPeriod {
    match period {
        ApiPeriod::Monthly => engine::BudgetPeriod::Monthly,
        ApiPeriod::Quarterly => engine::BudgetPeriod::Quarterly,
        ApiPeriod::Yearly => engine::BudgetPeriod::Yearly,
    }
}

pub(crate) fn map_budget(budget: engine::Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        name: budget.name,
        description: budget.description,
        total_minor: budget.total_minor,
        period: map_period(budget.period),
        start_date: budget.start_date,
        end_date: budget.end_date,
        categories: budget
            .categories
            .into_iter()
            .map(|allocation| AllocationView {
                category_id: allocation.category_id,
                allocated_minor: allocation.allocated_minor,
                spent_minor: allocation.spent_minor,
            })
            .collect(),
        expenses: budget.expenses.into_iter().map(map_expense).collect(),
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ApiSuccess<Vec<BudgetView>>>, ServerError> {
    let budgets = state.engine.list_budgets(&user.username).await?;
    Ok(Json(ApiSuccess::new(
        budgets.into_iter().map(map_budget).collect(),
    )))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<ApiSuccess<BudgetView>>), ServerError> {
    let budget = state
        .engine
        .create_budget(BudgetNewCmd {
            user_id: user.username,
            name: payload.name,
            description: payload.description,
            total_minor: payload.total_minor,
            period: payload.period.map(map_period_in),
            start_date: payload.start_date,
            end_date: payload.end_date,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiSuccess::new(map_budget(budget)))))
}

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(budget_id): Path<Uuid>,
) -> Result<Json<ApiSuccess<BudgetView>>, ServerError> {
    let budget = state.engine.budget(budget_id, &user.username).await?;
    Ok(Json(ApiSuccess::new(map_budget(budget))))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(budget_id): Path<Uuid>,
    Json(payload): Json<BudgetUpdate>,
) -> Result<Json<ApiSuccess<BudgetView>>, ServerError> {
    let budget = state
        .engine
        .update_budget(
            budget_id,
            &user.username,
            BudgetUpdateCmd {
                name: payload.name,
                description: payload.description,
                total_minor: payload.total_minor,
                period: payload.period.map(map_period_in),
                start_date: payload.start_date,
                end_date: payload.end_date,
            },
        )
        .await?;
    Ok(Json(ApiSuccess::new(map_budget(budget))))
}

/// Deletes the budget together with every expense recorded against it.
pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(budget_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_budget(budget_id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_category(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(budget_id): Path<Uuid>,
    Json(payload): Json<AllocationNew>,
) -> Result<(StatusCode, Json<ApiSuccess<BudgetView>>), ServerError> {
    let budget = state
        .engine
        .add_category_to_budget(CategoryAttachCmd {
            budget_id,
            category_id: payload.category_id,
            allocated_minor: payload.allocated_minor,
            user_id: user.username,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiSuccess::new(map_budget(budget)))))
}

/// Rebuilds every allocation's spent total from the expense table.
pub async fn recompute(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(budget_id): Path<Uuid>,
) -> Result<Json<ApiSuccess<BudgetView>>, ServerError> {
    let budget = state
        .engine
        .recompute_budget_spent(budget_id, &user.username)
        .await?;
    Ok(Json(ApiSuccess::new(map_budget(budget))))
}

pub async fn breakdown(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(budget_id): Path<Uuid>,
) -> Result<Json<ApiSuccess<SpendingBreakdown>>, ServerError> {
    let breakdown = state
        .engine
        .budget_breakdown(budget_id, &user.username)
        .await?;
    Ok(Json(ApiSuccess::new(SpendingBreakdown {
        total_spent_minor: breakdown.total_spent_minor,
        categories: breakdown
            .categories
            .into_iter()
            .map(|entry| CategorySpend {
                category_id: entry.category_id,
                spent_minor: entry.spent_minor,
                share_pct: entry.share_pct,
            })
            .collect(),
    })))
}
