//! Expense API endpoints

use api_types::{
    ApiSuccess,
    expense::{ExpenseList, ExpenseNew, ExpenseUpdate, ExpenseView},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::{ExpenseListFilter, ExpenseNewCmd, ExpenseUpdateCmd, users};

pub(crate) fn map_expense(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        budget_id: expense.budget_id,
        category_id: expense.category_id,
        amount_minor: expense.amount_minor,
        description: expense.description,
        date: expense.date,
        tags: expense.tags,
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(payload): Query<ExpenseList>,
) -> Result<Json<ApiSuccess<Vec<ExpenseView>>>, ServerError> {
    let filter = ExpenseListFilter {
        budget_id: payload.budget_id,
        category_id: payload.category_id,
    };
    let expenses = state.engine.list_expenses(&user.username, &filter).await?;
    Ok(Json(ApiSuccess::new(
        expenses.into_iter().map(map_expense).collect(),
    )))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ApiSuccess<ExpenseView>>), ServerError> {
    let mut cmd = ExpenseNewCmd::new(
        user.username,
        payload.budget_id,
        payload.category_id,
        payload.amount_minor,
    );
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(date) = payload.date {
        cmd = cmd.date(date);
    }
    if let Some(tags) = payload.tags {
        cmd = cmd.tags(tags);
    }

    let expense = state.engine.create_expense(cmd).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiSuccess::new(map_expense(expense))),
    ))
}

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
) -> Result<Json<ApiSuccess<ExpenseView>>, ServerError> {
    let expense = state.engine.expense(expense_id, &user.username).await?;
    Ok(Json(ApiSuccess::new(map_expense(expense))))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<ApiSuccess<ExpenseView>>, ServerError> {
    let expense = state
        .engine
        .update_expense(
            expense_id,
            &user.username,
            ExpenseUpdateCmd {
                amount_minor: payload.amount_minor,
                category_id: payload.category_id,
                description: payload.description,
                date: payload.date,
                tags: payload.tags,
            },
        )
        .await?;
    Ok(Json(ApiSuccess::new(map_expense(expense))))
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_expense(expense_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
