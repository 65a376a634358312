pub mod admin;
pub mod health;
pub mod products;
pub mod stores;
pub mod users;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::services::moderation_service::{ModerationAction, ScreenOutcome};
use crate::services::ServiceError;
use crate::state::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Users (owners and reviewers; credentials live elsewhere)
        .route("/users", post(users::create_user).get(users::list_users))
        // Stores
        .route(
            "/stores",
            post(stores::register_store).get(stores::list_stores),
        )
        .route(
            "/stores/:id",
            get(stores::get_store).put(stores::update_store),
        )
        .route(
            "/stores/:id/products",
            post(products::create_product).get(products::list_store_products),
        )
        .route(
            "/stores/:id/change-requests",
            post(stores::submit_change_request),
        )
        // Products
        .route(
            "/products/:id",
            get(products::get_product).put(products::update_product),
        )
        // Admin review queue
        .route(
            "/admin/change-requests",
            get(admin::list_pending_change_requests),
        )
        .route(
            "/admin/change-requests/:id/approve",
            post(admin::approve_change_request),
        )
        .route(
            "/admin/change-requests/:id/reject",
            post(admin::reject_change_request),
        )
        .route(
            "/admin/stores/:id/pending-count",
            get(admin::pending_changes_count),
        )
        .route("/admin/moderation-log", get(admin::list_moderation_log))
        .with_state(state)
}

/// Map the service error taxonomy onto HTTP statuses.
pub(crate) fn error_response(err: ServiceError) -> Response {
    let (status, message) = match &err {
        ServiceError::NotFound => (StatusCode::NOT_FOUND, err.to_string()),
        ServiceError::InvalidState(_) => (StatusCode::CONFLICT, err.to_string()),
        ServiceError::InvalidChangeType(_)
        | ServiceError::MissingTarget
        | ServiceError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        ServiceError::Database(_) | ServiceError::External(_) => {
            tracing::error!("Request failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    };
    (status, Json(json!({ "error": message }))).into_response()
}

/// Inline moderation outcome for vendor-facing create/update responses;
/// the details go out by email.
pub(crate) fn moderation_summary(outcome: &ScreenOutcome) -> Value {
    let message = match outcome.action {
        ModerationAction::Flag => {
            Some("Your content was flagged for review. Check your email for details.")
        }
        ModerationAction::Hide => {
            Some("Your content has been hidden. Check your email for details.")
        }
        ModerationAction::Suspend => {
            Some("Your store has been suspended. Check your email for details.")
        }
        ModerationAction::None if outcome.degraded => {
            Some("Your content is queued for manual review.")
        }
        ModerationAction::None => None,
    };
    json!({
        "action": outcome.action,
        "severity": outcome.severity,
        "message": message,
    })
}
