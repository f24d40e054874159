//! Profile endpoints for the authenticated user.

use api_types::{
    ApiSuccess,
    user::{UserUpdate, UserView},
};
use axum::{Extension, Json, extract::State};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{ServerError, server::ServerState};
use engine::{EngineError, users};

fn map_user(user: users::Model) -> UserView {
    UserView {
        username: user.username,
        name: user.name,
        currency: user.currency,
        theme: user.theme,
    }
}

pub async fn get(
    Extension(user): Extension<users::Model>,
) -> Result<Json<ApiSuccess<UserView>>, ServerError> {
    Ok(Json(ApiSuccess::new(map_user(user))))
}

/// Patches profile settings. Credentials are managed out of band.
pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<ApiSuccess<UserView>>, ServerError> {
    let mut active: users::ActiveModel = user.into();

    if let Some(name) = payload.name {
        active.name = ActiveValue::Set(name);
    }
    if let Some(currency) = payload.currency {
        active.currency = ActiveValue::Set(currency);
    }
    if let Some(theme) = payload.theme {
        active.theme = ActiveValue::Set(theme);
    }

    let updated = active.update(&state.db).await.map_err(EngineError::from)?;

    Ok(Json(ApiSuccess::new(map_user(updated))))
}
