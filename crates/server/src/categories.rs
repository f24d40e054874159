//! Category API endpoints

use api_types::{
    ApiSuccess,
    category::{CategoryNew, CategoryUpdate, CategoryView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::{CategoryNewCmd, CategoryUpdateCmd, users};

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        color: category.color,
        icon: category.icon,
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ApiSuccess<Vec<CategoryView>>>, ServerError> {
    let categories = state.engine.list_categories(&user.username).await?;
    Ok(Json(ApiSuccess::new(
        categories.into_iter().map(map_category).collect(),
    )))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<ApiSuccess<CategoryView>>), ServerError> {
    let category = state
        .engine
        .create_category(CategoryNewCmd {
            user_id: user.username,
            name: payload.name,
            color: payload.color,
            icon: payload.icon,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiSuccess::new(map_category(category))),
    ))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<ApiSuccess<CategoryView>>, ServerError> {
    let category = state
        .engine
        .update_category(
            category_id,
            &user.username,
            CategoryUpdateCmd {
                name: payload.name,
                color: payload.color,
                icon: payload.icon,
            },
        )
        .await?;
    Ok(Json(ApiSuccess::new(map_category(category))))
}

/// Deletes the category only. Budgets and expenses keep referencing the
/// dangling id; the ledger skips those pairs from then on.
pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(category_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_category(category_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
