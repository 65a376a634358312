//! Store Service - storefront registration and self-service profile edits
//!
//! Self-service edits follow the immediate-apply path: the write lands
//! first, then the merged post-update text is screened and enforcement
//! (up to suspension) happens on the stored row.

use sea_orm::*;

use crate::mailer::Mailer;
use crate::models::store::{self, Entity as Store, NewStore, StoreUpdate};
use crate::screener::ScreenerClient;
use crate::services::moderation_service::{self, ScreenOutcome};
use crate::services::ServiceError;

pub async fn register_store(
    db: &DatabaseConnection,
    screener: &ScreenerClient,
    mailer: &Mailer,
    admin_email: &str,
    data: NewStore,
) -> Result<(store::Model, ScreenOutcome), ServiceError> {
    if data.name.trim().is_empty() {
        return Err(ServiceError::Validation("Store name is required".into()));
    }
    if data.subdomain.trim().is_empty() {
        return Err(ServiceError::Validation("Subdomain is required".into()));
    }
    if data.contact_email.trim().is_empty() {
        return Err(ServiceError::Validation("Contact email is required".into()));
    }

    let now = chrono::Utc::now().to_rfc3339();
    let new_store = store::ActiveModel {
        owner_id: Set(data.owner_id),
        name: Set(data.name),
        subdomain: Set(data.subdomain.to_lowercase()),
        contact_email: Set(data.contact_email),
        description: Set(data.description),
        maker_bio: Set(data.maker_bio),
        welcome_message: Set(data.welcome_message),
        policies: Set(data.policies),
        logo_url: Set(data.logo_url),
        banner_url: Set(data.banner_url),
        status: Set("pending".to_owned()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    let saved = new_store.insert(db).await?;
    let outcome =
        moderation_service::screen_store_content(db, screener, mailer, admin_email, &saved).await?;

    // Enforcement may have touched the row; hand back the stored state.
    let refreshed = Store::find_by_id(saved.id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;
    Ok((refreshed, outcome))
}

pub async fn update_store(
    db: &DatabaseConnection,
    screener: &ScreenerClient,
    mailer: &Mailer,
    admin_email: &str,
    store_id: i32,
    update: StoreUpdate,
) -> Result<(store::Model, ScreenOutcome), ServiceError> {
    let existing = Store::find_by_id(store_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let mut active = assign_store_fields(existing, &update);
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());
    let updated = active.update(db).await?;

    let outcome =
        moderation_service::screen_store_content(db, screener, mailer, admin_email, &updated)
            .await?;

    let refreshed = Store::find_by_id(store_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;
    Ok((refreshed, outcome))
}

pub async fn get_store(db: &DatabaseConnection, id: i32) -> Result<store::Model, ServiceError> {
    Store::find_by_id(id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)
}

/// Public directory listing. Suspended stores are not visible.
pub async fn list_stores(db: &DatabaseConnection) -> Result<Vec<store::Model>, ServiceError> {
    let stores = Store::find()
        .filter(store::Column::Status.ne("suspended"))
        .order_by_asc(store::Column::Name)
        .all(db)
        .await?;
    Ok(stores)
}

/// Merge the present keys of a partial update into the row; absent keys
/// are left untouched.
pub(crate) fn assign_store_fields(model: store::Model, update: &StoreUpdate) -> store::ActiveModel {
    let mut active: store::ActiveModel = model.into();
    if let Some(name) = &update.name {
        active.name = Set(name.clone());
    }
    if let Some(contact_email) = &update.contact_email {
        active.contact_email = Set(contact_email.clone());
    }
    if let Some(description) = &update.description {
        active.description = Set(Some(description.clone()));
    }
    if let Some(maker_bio) = &update.maker_bio {
        active.maker_bio = Set(Some(maker_bio.clone()));
    }
    if let Some(welcome_message) = &update.welcome_message {
        active.welcome_message = Set(Some(welcome_message.clone()));
    }
    if let Some(policies) = &update.policies {
        active.policies = Set(Some(policies.clone()));
    }
    if let Some(logo_url) = &update.logo_url {
        active.logo_url = Set(Some(logo_url.clone()));
    }
    if let Some(banner_url) = &update.banner_url {
        active.banner_url = Set(Some(banner_url.clone()));
    }
    active
}
