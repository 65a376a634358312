//! Change Request Service - the admin-gated approval ledger
//!
//! Submissions stage proposed state (draft columns, inactive product
//! rows) and grade it for triage; review operations move a request from
//! `pending` to `approved` or `rejected` exactly once, carrying the
//! entity side effects in the same transaction. The transition itself is
//! a conditional `UPDATE ... WHERE status = 'pending'` so two
//! near-simultaneous reviewers cannot both apply it.

use sea_orm::sea_query::Expr;
use sea_orm::*;

use crate::models::change_request::{self, Entity as ChangeRequest};
use crate::models::product::{self, Entity as Product, NewProduct, ProductUpdate};
use crate::models::store::{Entity as Store, StoreUpdate};
use crate::screener::ScreenerClient;
use crate::services::moderation_service::{self, ContentKind, Severity};
use crate::services::{store_service, ServiceError};

/// Record proposed store-profile changes for admin review. Nothing is
/// staged on the store row; the payload is the change.
pub async fn submit_store_info(
    db: &DatabaseConnection,
    screener: &ScreenerClient,
    store_id: i32,
    update: StoreUpdate,
) -> Result<change_request::Model, ServiceError> {
    if update.is_empty() {
        return Err(ServiceError::Validation("No fields to change".into()));
    }

    let store = Store::find_by_id(store_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    // Grade the merged proposed view: existing value unless overridden.
    let name = update.name.clone().unwrap_or_else(|| store.name.clone());
    let description = update
        .description
        .clone()
        .or_else(|| store.description.clone())
        .unwrap_or_default();
    let maker_bio = update
        .maker_bio
        .clone()
        .or_else(|| store.maker_bio.clone())
        .unwrap_or_default();
    let welcome_message = update
        .welcome_message
        .clone()
        .or_else(|| store.welcome_message.clone())
        .unwrap_or_default();
    let fields = [
        ("name", name.as_str()),
        ("description", description.as_str()),
        ("maker_bio", maker_bio.as_str()),
        ("welcome_message", welcome_message.as_str()),
    ];
    let severity =
        moderation_service::screen_for_review(db, screener, ContentKind::Store, store_id, None, &fields)
            .await?;

    let new_data = serde_json::to_string(&update)
        .map_err(|e| ServiceError::Validation(format!("Unserializable payload: {}", e)))?;
    insert_request(db, store_id, None, "store_info", new_data, severity).await
}

/// Stage a new product for admin review: the row is inserted but stays
/// off the storefront until the request is approved.
pub async fn submit_product_create(
    db: &DatabaseConnection,
    screener: &ScreenerClient,
    store_id: i32,
    data: NewProduct,
) -> Result<(change_request::Model, product::Model), ServiceError> {
    Store::find_by_id(store_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    if data.name.trim().is_empty() {
        return Err(ServiceError::Validation("Product name is required".into()));
    }
    if data.price < 0.0 {
        return Err(ServiceError::Validation("Price cannot be negative".into()));
    }

    let now = chrono::Utc::now().to_rfc3339();
    let staged = product::ActiveModel {
        store_id: Set(store_id),
        name: Set(data.name.clone()),
        description: Set(data.description.clone()),
        price: Set(data.price),
        image_url: Set(data.image_url.clone()),
        active: Set(false),
        moderation_status: Set("pending".to_owned()),
        has_pending_changes: Set(true),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let saved = staged.insert(db).await?;

    let description = data.description.clone().unwrap_or_default();
    let fields = [
        ("name", data.name.as_str()),
        ("description", description.as_str()),
    ];
    let severity = moderation_service::screen_for_review(
        db,
        screener,
        ContentKind::Product,
        store_id,
        Some(saved.id),
        &fields,
    )
    .await?;

    let new_data = serde_json::to_string(&data)
        .map_err(|e| ServiceError::Validation(format!("Unserializable payload: {}", e)))?;
    let request =
        insert_request(db, store_id, Some(saved.id), "product_create", new_data, severity).await?;
    Ok((request, saved))
}

/// Stage field changes into the product's draft columns for admin
/// review. Live fields are untouched until approval.
pub async fn submit_product_update(
    db: &DatabaseConnection,
    screener: &ScreenerClient,
    product_id: i32,
    update: ProductUpdate,
) -> Result<change_request::Model, ServiceError> {
    if update.is_empty() {
        return Err(ServiceError::Validation("No fields to change".into()));
    }
    if let Some(price) = update.price {
        if price < 0.0 {
            return Err(ServiceError::Validation("Price cannot be negative".into()));
        }
    }

    let existing = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;
    if existing.has_pending_changes {
        return Err(ServiceError::InvalidState(
            "Product already has a pending change request".into(),
        ));
    }

    let mut active: product::ActiveModel = existing.clone().into();
    if let Some(name) = &update.name {
        active.draft_name = Set(Some(name.clone()));
    }
    if let Some(description) = &update.description {
        active.draft_description = Set(Some(description.clone()));
    }
    if let Some(price) = update.price {
        active.draft_price = Set(Some(price));
    }
    if let Some(image_url) = &update.image_url {
        active.draft_image_url = Set(Some(image_url.clone()));
    }
    active.has_pending_changes = Set(true);
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());
    active.update(db).await?;

    let name = update.name.clone().unwrap_or_else(|| existing.name.clone());
    let description = update
        .description
        .clone()
        .or_else(|| existing.description.clone())
        .unwrap_or_default();
    let fields = [
        ("name", name.as_str()),
        ("description", description.as_str()),
    ];
    let severity = moderation_service::screen_for_review(
        db,
        screener,
        ContentKind::Product,
        existing.store_id,
        Some(product_id),
        &fields,
    )
    .await?;

    let new_data = serde_json::to_string(&update)
        .map_err(|e| ServiceError::Validation(format!("Unserializable payload: {}", e)))?;
    insert_request(db, existing.store_id, Some(product_id), "product_update", new_data, severity)
        .await
}

/// Record a delisting request. No new text content, so nothing is
/// screened and the request triages at the bottom of the queue.
pub async fn submit_product_delete(
    db: &DatabaseConnection,
    product_id: i32,
) -> Result<change_request::Model, ServiceError> {
    let existing = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    insert_request(
        db,
        existing.store_id,
        Some(product_id),
        "product_delete",
        "{}".to_owned(),
        Severity::None,
    )
    .await
}

async fn insert_request(
    db: &DatabaseConnection,
    store_id: i32,
    product_id: Option<i32>,
    change_type: &str,
    new_data: String,
    severity: Severity,
) -> Result<change_request::Model, ServiceError> {
    let now = chrono::Utc::now().to_rfc3339();
    let request = change_request::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        store_id: Set(store_id),
        product_id: Set(product_id),
        change_type: Set(change_type.to_owned()),
        new_data: Set(new_data),
        moderation_severity: Set(severity.as_str().to_owned()),
        status: Set("pending".to_owned()),
        reviewer_id: Set(None),
        reviewed_at: Set(None),
        rejection_reason: Set(None),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    };
    let saved = request.insert(db).await?;
    Ok(saved)
}

/// Approve a pending request and apply its mutation to the target
/// entity. The status transition and the entity write commit together.
pub async fn apply_change_request(
    db: &DatabaseConnection,
    id: &str,
    reviewer_id: i32,
) -> Result<change_request::Model, ServiceError> {
    let txn = db.begin().await?;

    let request = ChangeRequest::find_by_id(id.to_owned())
        .one(&txn)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let now = chrono::Utc::now().to_rfc3339();
    let claimed = ChangeRequest::update_many()
        .col_expr(change_request::Column::Status, Expr::value("approved"))
        .col_expr(change_request::Column::ReviewerId, Expr::value(reviewer_id))
        .col_expr(change_request::Column::ReviewedAt, Expr::value(now.clone()))
        .col_expr(change_request::Column::UpdatedAt, Expr::value(now))
        .filter(change_request::Column::Id.eq(id))
        .filter(change_request::Column::Status.eq("pending"))
        .exec(&txn)
        .await?;
    if claimed.rows_affected == 0 {
        return Err(ServiceError::InvalidState(format!(
            "Change request is already {}",
            request.status
        )));
    }

    match request.change_type.as_str() {
        "store_info" => apply_store_info(&txn, &request).await?,
        "product_create" => apply_product_create(&txn, &request).await?,
        "product_update" => apply_product_update(&txn, &request).await?,
        "product_delete" => apply_product_delete(&txn, &request).await?,
        other => return Err(ServiceError::InvalidChangeType(other.to_owned())),
    }

    txn.commit().await?;

    ChangeRequest::find_by_id(id.to_owned())
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)
}

/// Reject a pending request, rolling back whatever its submission
/// staged, and record the reviewer's reason.
pub async fn reject_change_request(
    db: &DatabaseConnection,
    id: &str,
    reviewer_id: i32,
    reason: Option<String>,
) -> Result<change_request::Model, ServiceError> {
    let txn = db.begin().await?;

    let request = ChangeRequest::find_by_id(id.to_owned())
        .one(&txn)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let now = chrono::Utc::now().to_rfc3339();
    let claimed = ChangeRequest::update_many()
        .col_expr(change_request::Column::Status, Expr::value("rejected"))
        .col_expr(change_request::Column::ReviewerId, Expr::value(reviewer_id))
        .col_expr(change_request::Column::ReviewedAt, Expr::value(now.clone()))
        .col_expr(
            change_request::Column::RejectionReason,
            Expr::value(reason.clone()),
        )
        .col_expr(change_request::Column::UpdatedAt, Expr::value(now))
        .filter(change_request::Column::Id.eq(id))
        .filter(change_request::Column::Status.eq("pending"))
        .exec(&txn)
        .await?;
    if claimed.rows_affected == 0 {
        return Err(ServiceError::InvalidState(format!(
            "Change request is already {}",
            request.status
        )));
    }

    match request.change_type.as_str() {
        // The staged row was never live, so it goes away entirely.
        "product_create" => {
            let product_id = request.product_id.ok_or(ServiceError::MissingTarget)?;
            Product::delete_by_id(product_id).exec(&txn).await?;
        }
        // Discard drafts, leave live fields exactly as they were.
        "product_update" => {
            let product_id = request.product_id.ok_or(ServiceError::MissingTarget)?;
            let product = Product::find_by_id(product_id)
                .one(&txn)
                .await?
                .ok_or(ServiceError::NotFound)?;
            let mut active: product::ActiveModel = product.into();
            active.draft_name = Set(None);
            active.draft_description = Set(None);
            active.draft_price = Set(None);
            active.draft_image_url = Set(None);
            active.has_pending_changes = Set(false);
            active.updated_at = Set(chrono::Utc::now().to_rfc3339());
            active.update(&txn).await?;
        }
        "store_info" | "product_delete" => {}
        other => return Err(ServiceError::InvalidChangeType(other.to_owned())),
    }

    txn.commit().await?;

    ChangeRequest::find_by_id(id.to_owned())
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)
}

/// Number of open requests against one store (vendor dashboard badge).
pub async fn pending_changes_count(
    db: &DatabaseConnection,
    store_id: i32,
) -> Result<u64, ServiceError> {
    let count = ChangeRequest::find()
        .filter(change_request::Column::StoreId.eq(store_id))
        .filter(change_request::Column::Status.eq("pending"))
        .count(db)
        .await?;
    Ok(count)
}

/// The admin review queue: severe content first, oldest first within a
/// tier, so dangerous content is reviewed before benign backlog.
pub async fn list_pending_change_requests(
    db: &DatabaseConnection,
) -> Result<Vec<change_request::Model>, ServiceError> {
    let requests = ChangeRequest::find()
        .filter(change_request::Column::Status.eq("pending"))
        .order_by_desc(Expr::cust(
            "CASE moderation_severity WHEN 'severe' THEN 2 WHEN 'moderate' THEN 1 ELSE 0 END",
        ))
        .order_by_asc(change_request::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(requests)
}

async fn apply_store_info<C: ConnectionTrait>(
    conn: &C,
    request: &change_request::Model,
) -> Result<(), ServiceError> {
    let update: StoreUpdate = serde_json::from_str(&request.new_data)
        .map_err(|e| ServiceError::Validation(format!("Malformed store_info payload: {}", e)))?;

    let store = Store::find_by_id(request.store_id)
        .one(conn)
        .await?
        .ok_or(ServiceError::NotFound)?;

    // Partial update: keys absent from new_data are left untouched.
    let mut active = store_service::assign_store_fields(store, &update);
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());
    active.update(conn).await?;
    Ok(())
}

async fn apply_product_create<C: ConnectionTrait>(
    conn: &C,
    request: &change_request::Model,
) -> Result<(), ServiceError> {
    let product_id = request.product_id.ok_or(ServiceError::MissingTarget)?;
    let product = Product::find_by_id(product_id)
        .one(conn)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let mut active: product::ActiveModel = product.into();
    active.active = Set(true);
    active.has_pending_changes = Set(false);
    active.moderation_status = Set("approved".to_owned());
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());
    active.update(conn).await?;
    Ok(())
}

async fn apply_product_update<C: ConnectionTrait>(
    conn: &C,
    request: &change_request::Model,
) -> Result<(), ServiceError> {
    let product_id = request.product_id.ok_or(ServiceError::MissingTarget)?;
    let product = Product::find_by_id(product_id)
        .one(conn)
        .await?
        .ok_or(ServiceError::NotFound)?;

    // Each draft promotes independently; a null draft keeps the live value.
    let mut active: product::ActiveModel = product.clone().into();
    if let Some(name) = product.draft_name.clone() {
        active.name = Set(name);
    }
    if let Some(description) = product.draft_description.clone() {
        active.description = Set(Some(description));
    }
    if let Some(price) = product.draft_price {
        active.price = Set(price);
    }
    if let Some(image_url) = product.draft_image_url.clone() {
        active.image_url = Set(Some(image_url));
    }
    active.draft_name = Set(None);
    active.draft_description = Set(None);
    active.draft_price = Set(None);
    active.draft_image_url = Set(None);
    active.has_pending_changes = Set(false);
    active.moderation_status = Set("approved".to_owned());
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());
    active.update(conn).await?;
    Ok(())
}

async fn apply_product_delete<C: ConnectionTrait>(
    conn: &C,
    request: &change_request::Model,
) -> Result<(), ServiceError> {
    let product_id = request.product_id.ok_or(ServiceError::MissingTarget)?;
    let product = Product::find_by_id(product_id)
        .one(conn)
        .await?
        .ok_or(ServiceError::NotFound)?;

    // Soft delete: historical order lines keep referencing the row.
    let mut active: product::ActiveModel = product.into();
    active.active = Set(false);
    active.has_pending_changes = Set(false);
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());
    active.update(conn).await?;
    Ok(())
}
