use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::api::{error_response, moderation_summary};
use crate::models::product::{NewProduct, ProductUpdate};
use crate::services::product_service;
use crate::state::AppState;

pub async fn create_product(
    State(state): State<AppState>,
    Path(store_id): Path<i32>,
    Json(payload): Json<NewProduct>,
) -> impl IntoResponse {
    match product_service::create_product(
        &state.db,
        &state.screener,
        &state.mailer,
        &state.admin_email,
        store_id,
        payload,
    )
    .await
    {
        Ok((product, outcome)) => (
            StatusCode::CREATED,
            Json(json!({
                "product": product,
                "moderation": moderation_summary(&outcome),
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn list_store_products(
    State(state): State<AppState>,
    Path(store_id): Path<i32>,
) -> impl IntoResponse {
    match product_service::list_store_products(&state.db, store_id).await {
        Ok(products) => Json(json!({
            "products": products,
            "total": products.len()
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_product(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    match product_service::get_product(&state.db, id).await {
        Ok(product) => Json(json!({ "product": product })).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ProductUpdate>,
) -> impl IntoResponse {
    match product_service::update_product(
        &state.db,
        &state.screener,
        &state.mailer,
        &state.admin_email,
        id,
        payload,
    )
    .await
    {
        Ok((product, outcome)) => Json(json!({
            "product": product,
            "moderation": moderation_summary(&outcome),
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}
