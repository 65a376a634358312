use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::api::{error_response, moderation_summary};
use crate::models::change_request::ChangeRequestPayload;
use crate::models::product::{NewProduct, ProductUpdate};
use crate::models::store::{NewStore, StoreUpdate};
use crate::services::{change_request_service, store_service, ServiceError};
use crate::state::AppState;

pub async fn register_store(
    State(state): State<AppState>,
    Json(payload): Json<NewStore>,
) -> impl IntoResponse {
    match store_service::register_store(
        &state.db,
        &state.screener,
        &state.mailer,
        &state.admin_email,
        payload,
    )
    .await
    {
        Ok((store, outcome)) => (
            StatusCode::CREATED,
            Json(json!({
                "store": store,
                "moderation": moderation_summary(&outcome),
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/stores",
    responses(
        (status = 200, description = "Public store directory (suspended stores excluded)")
    )
)]
pub async fn list_stores(State(state): State<AppState>) -> impl IntoResponse {
    match store_service::list_stores(&state.db).await {
        Ok(stores) => Json(json!({
            "stores": stores,
            "total": stores.len()
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_store(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    match store_service::get_store(&state.db, id).await {
        Ok(store) => Json(json!({ "store": store })).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn update_store(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<StoreUpdate>,
) -> impl IntoResponse {
    match store_service::update_store(
        &state.db,
        &state.screener,
        &state.mailer,
        &state.admin_email,
        id,
        payload,
    )
    .await
    {
        Ok((store, outcome)) => Json(json!({
            "store": store,
            "moderation": moderation_summary(&outcome),
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// One submission endpoint for the admin-reviewed ledger path,
/// dispatched on `change_type` like the ledger itself.
pub async fn submit_change_request(
    State(state): State<AppState>,
    Path(store_id): Path<i32>,
    Json(payload): Json<ChangeRequestPayload>,
) -> impl IntoResponse {
    match payload.change_type.as_str() {
        "store_info" => {
            let update: StoreUpdate = match serde_json::from_value(payload.data) {
                Ok(update) => update,
                Err(e) => {
                    return error_response(ServiceError::Validation(format!(
                        "Malformed store_info payload: {}",
                        e
                    )))
                }
            };
            match change_request_service::submit_store_info(
                &state.db,
                &state.screener,
                store_id,
                update,
            )
            .await
            {
                Ok(request) => (
                    StatusCode::CREATED,
                    Json(json!({ "change_request": request })),
                )
                    .into_response(),
                Err(e) => error_response(e),
            }
        }
        "product_create" => {
            let data: NewProduct = match serde_json::from_value(payload.data) {
                Ok(data) => data,
                Err(e) => {
                    return error_response(ServiceError::Validation(format!(
                        "Malformed product_create payload: {}",
                        e
                    )))
                }
            };
            match change_request_service::submit_product_create(
                &state.db,
                &state.screener,
                store_id,
                data,
            )
            .await
            {
                Ok((request, product)) => (
                    StatusCode::CREATED,
                    Json(json!({ "change_request": request, "product": product })),
                )
                    .into_response(),
                Err(e) => error_response(e),
            }
        }
        "product_update" => {
            let Some(product_id) = payload.product_id else {
                return error_response(ServiceError::MissingTarget);
            };
            let update: ProductUpdate = match serde_json::from_value(payload.data) {
                Ok(update) => update,
                Err(e) => {
                    return error_response(ServiceError::Validation(format!(
                        "Malformed product_update payload: {}",
                        e
                    )))
                }
            };
            match change_request_service::submit_product_update(
                &state.db,
                &state.screener,
                product_id,
                update,
            )
            .await
            {
                Ok(request) => (
                    StatusCode::CREATED,
                    Json(json!({ "change_request": request })),
                )
                    .into_response(),
                Err(e) => error_response(e),
            }
        }
        "product_delete" => {
            let Some(product_id) = payload.product_id else {
                return error_response(ServiceError::MissingTarget);
            };
            match change_request_service::submit_product_delete(&state.db, product_id).await {
                Ok(request) => (
                    StatusCode::CREATED,
                    Json(json!({ "change_request": request })),
                )
                    .into_response(),
                Err(e) => error_response(e),
            }
        }
        other => error_response(ServiceError::InvalidChangeType(other.to_owned())),
    }
}
