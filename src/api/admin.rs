use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::Deserialize;
use serde_json::json;

use crate::api::error_response;
use crate::models::change_request::ReviewAction;
use crate::models::moderation_log::{self, Entity as ModerationLog};
use crate::services::change_request_service;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/admin/change-requests",
    responses(
        (status = 200, description = "Pending change requests, severe-first then oldest-first")
    )
)]
pub async fn list_pending_change_requests(State(state): State<AppState>) -> impl IntoResponse {
    match change_request_service::list_pending_change_requests(&state.db).await {
        Ok(requests) => Json(json!({
            "change_requests": requests,
            "total": requests.len()
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn approve_change_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ReviewAction>,
) -> impl IntoResponse {
    match change_request_service::apply_change_request(&state.db, &id, payload.reviewer_id).await {
        Ok(request) => Json(json!({ "change_request": request })).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn reject_change_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ReviewAction>,
) -> impl IntoResponse {
    match change_request_service::reject_change_request(
        &state.db,
        &id,
        payload.reviewer_id,
        payload.reason,
    )
    .await
    {
        Ok(request) => Json(json!({ "change_request": request })).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn pending_changes_count(
    State(state): State<AppState>,
    Path(store_id): Path<i32>,
) -> impl IntoResponse {
    match change_request_service::pending_changes_count(&state.db, store_id).await {
        Ok(count) => Json(json!({ "store_id": store_id, "pending": count })).into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct ModerationLogQuery {
    pub store_id: Option<i32>,
    pub limit: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/api/admin/moderation-log",
    responses(
        (status = 200, description = "Recent moderation checks, newest first")
    )
)]
pub async fn list_moderation_log(
    State(state): State<AppState>,
    Query(params): Query<ModerationLogQuery>,
) -> impl IntoResponse {
    let mut query = ModerationLog::find();
    if let Some(store_id) = params.store_id {
        query = query.filter(moderation_log::Column::StoreId.eq(store_id));
    }

    let result = query
        .order_by_desc(moderation_log::Column::CheckedAt)
        .limit(params.limit.unwrap_or(100))
        .all(&state.db)
        .await;

    match result {
        Ok(entries) => Json(json!({
            "entries": entries,
            "total": entries.len()
        }))
        .into_response(),
        Err(e) => error_response(e.into()),
    }
}
