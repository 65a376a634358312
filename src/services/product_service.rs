//! Product Service - listing CRUD on the immediate-apply path
//!
//! Direct vendor edits land on the live fields right away, then the
//! post-update content is screened. Draft staging is reserved for the
//! admin-reviewed change-request path (see change_request_service).

use sea_orm::*;

use crate::mailer::Mailer;
use crate::models::product::{self, Entity as Product, NewProduct, ProductUpdate};
use crate::models::store::Entity as Store;
use crate::screener::ScreenerClient;
use crate::services::moderation_service::{self, ScreenOutcome};
use crate::services::ServiceError;

pub async fn create_product(
    db: &DatabaseConnection,
    screener: &ScreenerClient,
    mailer: &Mailer,
    admin_email: &str,
    store_id: i32,
    data: NewProduct,
) -> Result<(product::Model, ScreenOutcome), ServiceError> {
    let store = Store::find_by_id(store_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    if data.name.trim().is_empty() {
        return Err(ServiceError::Validation("Product name is required".into()));
    }
    if data.price < 0.0 {
        return Err(ServiceError::Validation("Price cannot be negative".into()));
    }

    // Listings go live immediately; severe violations flip them back off
    // below, moderate ones only flag them.
    let now = chrono::Utc::now().to_rfc3339();
    let new_product = product::ActiveModel {
        store_id: Set(store_id),
        name: Set(data.name),
        description: Set(data.description),
        price: Set(data.price),
        image_url: Set(data.image_url),
        active: Set(true),
        moderation_status: Set("approved".to_owned()),
        has_pending_changes: Set(false),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let saved = new_product.insert(db).await?;

    let outcome =
        moderation_service::screen_product_content(db, screener, mailer, admin_email, &store, &saved)
            .await?;

    let refreshed = Product::find_by_id(saved.id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;
    Ok((refreshed, outcome))
}

pub async fn update_product(
    db: &DatabaseConnection,
    screener: &ScreenerClient,
    mailer: &Mailer,
    admin_email: &str,
    product_id: i32,
    update: ProductUpdate,
) -> Result<(product::Model, ScreenOutcome), ServiceError> {
    if update.is_empty() {
        return Err(ServiceError::Validation("No fields to update".into()));
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
    let store = Store::find_by_id(existing.store_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let mut active: product::ActiveModel = existing.into();
    if let Some(name) = &update.name {
        active.name = Set(name.clone());
    }
    if let Some(description) = &update.description {
        active.description = Set(Some(description.clone()));
    }
    if let Some(price) = update.price {
        active.price = Set(price);
    }
    if let Some(image_url) = &update.image_url {
        active.image_url = Set(Some(image_url.clone()));
    }
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());
    let updated = active.update(db).await?;

    let outcome = moderation_service::screen_product_content(
        db, screener, mailer, admin_email, &store, &updated,
    )
    .await?;

    let refreshed = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;
    Ok((refreshed, outcome))
}

pub async fn get_product(db: &DatabaseConnection, id: i32) -> Result<product::Model, ServiceError> {
    Product::find_by_id(id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)
}

/// Storefront listing: only live products are visible.
pub async fn list_store_products(
    db: &DatabaseConnection,
    store_id: i32,
) -> Result<Vec<product::Model>, ServiceError> {
    let products = Product::find()
        .filter(product::Column::StoreId.eq(store_id))
        .filter(product::Column::Active.eq(true))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await?;
    Ok(products)
}
