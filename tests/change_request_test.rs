//! Change-request ledger tests: draft staging, single-shot transitions,
//! rollback on rejection and admin queue triage ordering.

use makerstreet::db;
use makerstreet::models::product::{self, Entity as Product, NewProduct, ProductUpdate};
use makerstreet::models::store::{self, Entity as Store, StoreUpdate};
use makerstreet::models::{change_request, user};
use makerstreet::screener::ScreenerClient;
use makerstreet::services::{change_request_service, ServiceError};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

// Helper to create a test user
async fn create_test_user(db: &DatabaseConnection, username: &str, role: &str) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let user_model = user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{}@example.com", username)),
        role: Set(role.to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let res = user_model.insert(db).await.expect("Failed to create user");
    res.id
}

// Helper to create a test store
async fn create_test_store(db: &DatabaseConnection, owner_id: i32, name: &str) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let store_model = store::ActiveModel {
        owner_id: Set(owner_id),
        name: Set(name.to_string()),
        subdomain: Set(name.to_lowercase().replace(' ', "-")),
        contact_email: Set(format!("{}@example.com", name.to_lowercase())),
        description: Set(Some("Handmade goods".to_string())),
        status: Set("approved".to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let res = store_model.insert(db).await.expect("Failed to create store");
    res.id
}

// Helper to create a live test product
async fn create_test_product(
    db: &DatabaseConnection,
    store_id: i32,
    name: &str,
    price: f64,
) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let product_model = product::ActiveModel {
        store_id: Set(store_id),
        name: Set(name.to_string()),
        description: Set(Some("Widget".to_string())),
        price: Set(price),
        active: Set(true),
        moderation_status: Set("approved".to_string()),
        has_pending_changes: Set(false),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let res = product_model
        .insert(db)
        .await
        .expect("Failed to create product");
    res.id
}

// Helper to insert a pending change request directly with a controlled
// severity and timestamp
async fn insert_pending_request(
    db: &DatabaseConnection,
    store_id: i32,
    severity: &str,
    created_at: &str,
) -> String {
    let id = uuid::Uuid::new_v4().to_string();
    let request = change_request::ActiveModel {
        id: Set(id.clone()),
        store_id: Set(store_id),
        product_id: Set(None),
        change_type: Set("store_info".to_string()),
        new_data: Set("{}".to_string()),
        moderation_severity: Set(severity.to_string()),
        status: Set("pending".to_string()),
        reviewer_id: Set(None),
        reviewed_at: Set(None),
        rejection_reason: Set(None),
        created_at: Set(created_at.to_string()),
        updated_at: Set(created_at.to_string()),
    };
    request.insert(db).await.expect("Failed to insert request");
    id
}

// Screener stub answering every check with the given verdict
async fn mock_screener(is_violation: bool, severity: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/screen"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_violation": is_violation,
            "severity": severity,
            "categories": ["prohibited_items"],
            "reason": "Listing violates marketplace policy",
            "confidence": 0.92
        })))
        .mount(&server)
        .await;
    server
}

fn screener_client(server: &MockServer) -> ScreenerClient {
    ScreenerClient::new(&server.uri(), None).expect("Failed to build screener client")
}

#[tokio::test]
async fn test_submit_product_update_stages_drafts() {
    let db = setup_test_db().await;
    let owner = create_test_user(&db, "vendor1", "vendor").await;
    let store_id = create_test_store(&db, owner, "Clayworks").await;
    let product_id = create_test_product(&db, store_id, "Mug", 9.99).await;

    let screener_server = mock_screener(false, "none").await;
    let screener = screener_client(&screener_server);

    let update = ProductUpdate {
        price: Some(19.99),
        ..Default::default()
    };
    let request = change_request_service::submit_product_update(&db, &screener, product_id, update)
        .await
        .expect("Submit failed");

    assert_eq!(request.change_type, "product_update");
    assert_eq!(request.status, "pending");
    assert_eq!(request.moderation_severity, "none");
    assert_eq!(request.product_id, Some(product_id));

    // Drafts staged, live fields untouched
    let product = Product::find_by_id(product_id).one(&db).await.unwrap().unwrap();
    assert_eq!(product.price, 9.99);
    assert_eq!(product.draft_price, Some(19.99));
    assert_eq!(product.draft_name, None);
    assert!(product.has_pending_changes);
}

#[tokio::test]
async fn test_apply_product_update_promotes_only_staged_fields() {
    let db = setup_test_db().await;
    let owner = create_test_user(&db, "vendor1", "vendor").await;
    let admin = create_test_user(&db, "admin1", "admin").await;
    let store_id = create_test_store(&db, owner, "Clayworks").await;
    let product_id = create_test_product(&db, store_id, "Mug", 9.99).await;

    let screener_server = mock_screener(false, "none").await;
    let screener = screener_client(&screener_server);

    let update = ProductUpdate {
        price: Some(19.99),
        ..Default::default()
    };
    let request = change_request_service::submit_product_update(&db, &screener, product_id, update)
        .await
        .expect("Submit failed");

    let approved = change_request_service::apply_change_request(&db, &request.id, admin)
        .await
        .expect("Apply failed");
    assert_eq!(approved.status, "approved");
    assert_eq!(approved.reviewer_id, Some(admin));
    assert!(approved.reviewed_at.is_some());

    // Only the staged price promoted; description and name untouched
    let product = Product::find_by_id(product_id).one(&db).await.unwrap().unwrap();
    assert_eq!(product.price, 19.99);
    assert_eq!(product.name, "Mug");
    assert_eq!(product.description, Some("Widget".to_string()));
    assert_eq!(product.draft_price, None);
    assert_eq!(product.draft_name, None);
    assert_eq!(product.draft_description, None);
    assert_eq!(product.draft_image_url, None);
    assert!(!product.has_pending_changes);
    assert_eq!(product.moderation_status, "approved");
}

#[tokio::test]
async fn test_resolved_request_cannot_be_reapplied() {
    let db = setup_test_db().await;
    let owner = create_test_user(&db, "vendor1", "vendor").await;
    let admin = create_test_user(&db, "admin1", "admin").await;
    let store_id = create_test_store(&db, owner, "Clayworks").await;
    let product_id = create_test_product(&db, store_id, "Mug", 9.99).await;

    let screener_server = mock_screener(false, "none").await;
    let screener = screener_client(&screener_server);

    let update = ProductUpdate {
        price: Some(12.50),
        ..Default::default()
    };
    let request = change_request_service::submit_product_update(&db, &screener, product_id, update)
        .await
        .expect("Submit failed");

    change_request_service::apply_change_request(&db, &request.id, admin)
        .await
        .expect("First apply failed");

    // Second apply must not re-run the promotion
    let err = change_request_service::apply_change_request(&db, &request.id, admin)
        .await
        .expect_err("Second apply should fail");
    assert!(matches!(err, ServiceError::InvalidState(_)));

    // Nor can an approved request be rejected afterwards
    let err = change_request_service::reject_change_request(&db, &request.id, admin, None)
        .await
        .expect_err("Reject after approve should fail");
    assert!(matches!(err, ServiceError::InvalidState(_)));
}

#[tokio::test]
async fn test_reject_product_update_discards_drafts() {
    let db = setup_test_db().await;
    let owner = create_test_user(&db, "vendor1", "vendor").await;
    let admin = create_test_user(&db, "admin1", "admin").await;
    let store_id = create_test_store(&db, owner, "Clayworks").await;
    let product_id = create_test_product(&db, store_id, "Mug", 9.99).await;

    let screener_server = mock_screener(false, "none").await;
    let screener = screener_client(&screener_server);

    let update = ProductUpdate {
        name: Some("Luxury Mug".to_string()),
        price: Some(49.99),
        ..Default::default()
    };
    let request = change_request_service::submit_product_update(&db, &screener, product_id, update)
        .await
        .expect("Submit failed");

    let rejected = change_request_service::reject_change_request(
        &db,
        &request.id,
        admin,
        Some("Misleading name".to_string()),
    )
    .await
    .expect("Reject failed");
    assert_eq!(rejected.status, "rejected");
    assert_eq!(rejected.rejection_reason, Some("Misleading name".to_string()));

    // Live fields exactly as before, drafts gone
    let product = Product::find_by_id(product_id).one(&db).await.unwrap().unwrap();
    assert_eq!(product.name, "Mug");
    assert_eq!(product.price, 9.99);
    assert_eq!(product.draft_name, None);
    assert_eq!(product.draft_price, None);
    assert!(!product.has_pending_changes);

    // A rejection is just as terminal as an approval
    let err = change_request_service::reject_change_request(&db, &request.id, admin, None)
        .await
        .expect_err("Second reject should fail");
    assert!(matches!(err, ServiceError::InvalidState(_)));
}

#[tokio::test]
async fn test_product_create_lifecycle() {
    let db = setup_test_db().await;
    let owner = create_test_user(&db, "vendor1", "vendor").await;
    let admin = create_test_user(&db, "admin1", "admin").await;
    let store_id = create_test_store(&db, owner, "Clayworks").await;

    let screener_server = mock_screener(false, "none").await;
    let screener = screener_client(&screener_server);

    let data = NewProduct {
        name: "Teapot".to_string(),
        description: Some("Hand-thrown teapot".to_string()),
        price: 42.0,
        image_url: None,
    };
    let (request, staged) =
        change_request_service::submit_product_create(&db, &screener, store_id, data)
            .await
            .expect("Submit failed");

    // Staged row is off the storefront until approval
    assert!(!staged.active);
    assert_eq!(staged.moderation_status, "pending");
    assert!(staged.has_pending_changes);

    change_request_service::apply_change_request(&db, &request.id, admin)
        .await
        .expect("Apply failed");

    let product = Product::find_by_id(staged.id).one(&db).await.unwrap().unwrap();
    assert!(product.active);
    assert!(!product.has_pending_changes);
    assert_eq!(product.moderation_status, "approved");
}

#[tokio::test]
async fn test_reject_product_create_deletes_row() {
    let db = setup_test_db().await;
    let owner = create_test_user(&db, "vendor1", "vendor").await;
    let admin = create_test_user(&db, "admin1", "admin").await;
    let store_id = create_test_store(&db, owner, "Clayworks").await;

    let screener_server = mock_screener(false, "none").await;
    let screener = screener_client(&screener_server);

    let data = NewProduct {
        name: "Teapot".to_string(),
        description: None,
        price: 42.0,
        image_url: None,
    };
    let (request, staged) =
        change_request_service::submit_product_create(&db, &screener, store_id, data)
            .await
            .expect("Submit failed");

    let rejected = change_request_service::reject_change_request(
        &db,
        &request.id,
        admin,
        Some("Duplicate listing".to_string()),
    )
    .await
    .expect("Reject failed");
    assert_eq!(rejected.status, "rejected");
    assert_eq!(
        rejected.rejection_reason,
        Some("Duplicate listing".to_string())
    );

    // The row was never live, so it is gone entirely
    let product = Product::find_by_id(staged.id).one(&db).await.unwrap();
    assert!(product.is_none());
}

#[tokio::test]
async fn test_apply_store_info_merges_present_keys_only() {
    let db = setup_test_db().await;
    let owner = create_test_user(&db, "vendor1", "vendor").await;
    let admin = create_test_user(&db, "admin1", "admin").await;
    let store_id = create_test_store(&db, owner, "Clayworks").await;

    let screener_server = mock_screener(false, "none").await;
    let screener = screener_client(&screener_server);

    let update = StoreUpdate {
        description: Some("Ceramics from our studio".to_string()),
        ..Default::default()
    };
    let request = change_request_service::submit_store_info(&db, &screener, store_id, update)
        .await
        .expect("Submit failed");

    change_request_service::apply_change_request(&db, &request.id, admin)
        .await
        .expect("Apply failed");

    let store = Store::find_by_id(store_id).one(&db).await.unwrap().unwrap();
    assert_eq!(store.name, "Clayworks");
    assert_eq!(
        store.description,
        Some("Ceramics from our studio".to_string())
    );
    assert_eq!(store.subdomain, "clayworks");
}

#[tokio::test]
async fn test_apply_product_delete_soft_deletes() {
    let db = setup_test_db().await;
    let owner = create_test_user(&db, "vendor1", "vendor").await;
    let admin = create_test_user(&db, "admin1", "admin").await;
    let store_id = create_test_store(&db, owner, "Clayworks").await;
    let product_id = create_test_product(&db, store_id, "Mug", 9.99).await;

    let request = change_request_service::submit_product_delete(&db, product_id)
        .await
        .expect("Submit failed");
    assert_eq!(request.moderation_severity, "none");

    change_request_service::apply_change_request(&db, &request.id, admin)
        .await
        .expect("Apply failed");

    // Row retained for historical order lines, but off the storefront
    let product = Product::find_by_id(product_id).one(&db).await.unwrap().unwrap();
    assert!(!product.active);
    assert!(!product.has_pending_changes);
}

#[tokio::test]
async fn test_unknown_request_id_is_not_found() {
    let db = setup_test_db().await;
    let admin = create_test_user(&db, "admin1", "admin").await;

    let err = change_request_service::apply_change_request(&db, "no-such-id", admin)
        .await
        .expect_err("Apply should fail");
    assert!(matches!(err, ServiceError::NotFound));

    let err = change_request_service::reject_change_request(&db, "no-such-id", admin, None)
        .await
        .expect_err("Reject should fail");
    assert!(matches!(err, ServiceError::NotFound));
}

#[tokio::test]
async fn test_duplicate_pending_update_is_rejected() {
    let db = setup_test_db().await;
    let owner = create_test_user(&db, "vendor1", "vendor").await;
    let store_id = create_test_store(&db, owner, "Clayworks").await;
    let product_id = create_test_product(&db, store_id, "Mug", 9.99).await;

    let screener_server = mock_screener(false, "none").await;
    let screener = screener_client(&screener_server);

    let update = ProductUpdate {
        price: Some(11.0),
        ..Default::default()
    };
    change_request_service::submit_product_update(&db, &screener, product_id, update.clone())
        .await
        .expect("First submit failed");

    let err = change_request_service::submit_product_update(&db, &screener, product_id, update)
        .await
        .expect_err("Second submit should fail");
    assert!(matches!(err, ServiceError::InvalidState(_)));
}

#[tokio::test]
async fn test_empty_update_fails_validation() {
    let db = setup_test_db().await;
    let owner = create_test_user(&db, "vendor1", "vendor").await;
    let store_id = create_test_store(&db, owner, "Clayworks").await;
    let product_id = create_test_product(&db, store_id, "Mug", 9.99).await;

    let screener_server = mock_screener(false, "none").await;
    let screener = screener_client(&screener_server);

    let err = change_request_service::submit_product_update(
        &db,
        &screener,
        product_id,
        ProductUpdate::default(),
    )
    .await
    .expect_err("Empty update should fail");
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_submission_records_screener_severity() {
    let db = setup_test_db().await;
    let owner = create_test_user(&db, "vendor1", "vendor").await;
    let store_id = create_test_store(&db, owner, "Clayworks").await;
    let product_id = create_test_product(&db, store_id, "Mug", 9.99).await;

    let screener_server = mock_screener(true, "severe").await;
    let screener = screener_client(&screener_server);

    let update = ProductUpdate {
        description: Some("Questionable description".to_string()),
        ..Default::default()
    };
    let request = change_request_service::submit_product_update(&db, &screener, product_id, update)
        .await
        .expect("Submit failed");
    assert_eq!(request.moderation_severity, "severe");

    // Proposed content is graded, not enforced: live fields stay put
    let product = Product::find_by_id(product_id).one(&db).await.unwrap().unwrap();
    assert!(product.active);
    assert_eq!(product.moderation_status, "approved");
}

#[tokio::test]
async fn test_pending_queue_triage_order() {
    let db = setup_test_db().await;
    let owner = create_test_user(&db, "vendor1", "vendor").await;
    let store_id = create_test_store(&db, owner, "Clayworks").await;

    let benign = insert_pending_request(&db, store_id, "none", "2024-01-01T00:00:00+00:00").await;
    let severe_new =
        insert_pending_request(&db, store_id, "severe", "2024-01-04T00:00:00+00:00").await;
    let moderate =
        insert_pending_request(&db, store_id, "moderate", "2024-01-02T00:00:00+00:00").await;
    let severe_old =
        insert_pending_request(&db, store_id, "severe", "2024-01-03T00:00:00+00:00").await;

    let queue = change_request_service::list_pending_change_requests(&db)
        .await
        .expect("List failed");

    let ids: Vec<&str> = queue.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            severe_old.as_str(),
            severe_new.as_str(),
            moderate.as_str(),
            benign.as_str()
        ]
    );
}

#[tokio::test]
async fn test_pending_changes_count_per_store() {
    let db = setup_test_db().await;
    let owner = create_test_user(&db, "vendor1", "vendor").await;
    let store_a = create_test_store(&db, owner, "Clayworks").await;
    let store_b = create_test_store(&db, owner, "Woodshop").await;
    let admin = create_test_user(&db, "admin1", "admin").await;

    insert_pending_request(&db, store_a, "none", "2024-01-01T00:00:00+00:00").await;
    insert_pending_request(&db, store_a, "moderate", "2024-01-02T00:00:00+00:00").await;
    insert_pending_request(&db, store_b, "none", "2024-01-03T00:00:00+00:00").await;
    let resolved =
        insert_pending_request(&db, store_a, "none", "2024-01-04T00:00:00+00:00").await;
    change_request_service::apply_change_request(&db, &resolved, admin)
        .await
        .expect("Apply failed");

    let count = change_request_service::pending_changes_count(&db, store_a)
        .await
        .expect("Count failed");
    assert_eq!(count, 2);
}
