use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::stores::list_stores,
        api::admin::list_pending_change_requests,
        api::admin::list_moderation_log,
        // Add other endpoints here as we document them
    ),
    tags(
        (name = "makerstreet", description = "Makerstreet marketplace moderation API")
    )
)]
pub struct ApiDoc;
