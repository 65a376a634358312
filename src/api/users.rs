use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::{json, Value};

use crate::models::user::{self, Entity as UserEntity, NewUser};
use crate::state::AppState;

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> impl IntoResponse {
    let now = chrono::Utc::now().to_rfc3339();

    let new_user = user::ActiveModel {
        username: Set(payload.username),
        email: Set(payload.email),
        role: Set(payload.role.unwrap_or_else(|| "vendor".to_string())),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_user.insert(&state.db).await {
        Ok(model) => (StatusCode::CREATED, Json(json!({ "user": model }))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let users = UserEntity::find()
        .all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(json!({
        "users": users,
        "total": users.len()
    })))
}
