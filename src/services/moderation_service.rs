//! Moderation Service - severity policy and enforcement
//!
//! The policy decision is a pure function; the `screen_*` orchestrators
//! around it call the external screener, append the audit row, apply the
//! decided action to the entity and fire best-effort notifications.

use sea_orm::*;
use serde::Serialize;

use crate::mailer::Mailer;
use crate::models::{moderation_log, product, store};
use crate::screener::{ScreenerClient, ScreeningResult};
use crate::services::notification_service::{self, ModerationNotice};
use crate::services::ServiceError;

/// What kind of entity a piece of text belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Store,
    Product,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Store => "store",
            ContentKind::Product => "product",
        }
    }
}

/// Screener severity tier, ordered from least to most restrictive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Moderate,
    Severe,
}

impl Severity {
    /// Unknown tiers from the screener degrade to `Moderate` rather than
    /// being dropped, so a new tier never passes unmoderated.
    pub fn parse(s: &str) -> Severity {
        match s {
            "none" => Severity::None,
            "moderate" => Severity::Moderate,
            "severe" => Severity::Severe,
            other => {
                tracing::warn!("Unknown moderation severity '{}', treating as moderate", other);
                Severity::Moderate
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

/// Enforcement decided for a screening result.
///
/// `Flag` is advisory (notify, and mark products as flagged); `Hide`
/// takes a product off the storefront; `Suspend` takes the whole store
/// down. Severe violations are self-enforcing because admin review may
/// be delayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    None,
    Flag,
    Hide,
    Suspend,
}

/// Pure decision table mapping a screening result to an action.
pub fn decide_action(kind: ContentKind, is_violation: bool, severity: Severity) -> ModerationAction {
    if !is_violation || severity == Severity::None {
        return ModerationAction::None;
    }

    match (kind, severity) {
        (_, Severity::None) => ModerationAction::None,
        (_, Severity::Moderate) => ModerationAction::Flag,
        (ContentKind::Product, Severity::Severe) => ModerationAction::Hide,
        (ContentKind::Store, Severity::Severe) => ModerationAction::Suspend,
    }
}

/// Result of one orchestrated screening, returned to handlers so the
/// vendor UI can surface the outcome inline.
#[derive(Debug, Clone, Serialize)]
pub struct ScreenOutcome {
    pub action: ModerationAction,
    pub severity: Severity,
    pub is_violation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// True when the screener was unreachable and the content was queued
    /// for manual review instead.
    pub degraded: bool,
}

/// Screen a product's live text fields and enforce the decided action.
///
/// Appends exactly one moderation_log row per call, also when the
/// screener is down.
pub async fn screen_product_content(
    db: &DatabaseConnection,
    screener: &ScreenerClient,
    mailer: &Mailer,
    admin_email: &str,
    store: &store::Model,
    product: &product::Model,
) -> Result<ScreenOutcome, ServiceError> {
    let description = product.description.clone().unwrap_or_default();
    let fields = [
        ("name", product.name.as_str()),
        ("description", description.as_str()),
    ];

    let result = match screener.screen(ContentKind::Product.as_str(), &fields).await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(
                "Moderation screener unavailable for product {}: {} (queued for manual review)",
                product.id,
                e
            );
            let degraded = degraded_result(&e);
            record_check(db, ContentKind::Product, store.id, Some(product.id), &degraded).await?;

            // Fail open: keep the write, but pull the listing back into the
            // manual review queue instead of letting it pass unmoderated.
            let mut active: product::ActiveModel = product.clone().into();
            active.moderation_status = Set("pending".to_owned());
            active.updated_at = Set(chrono::Utc::now().to_rfc3339());
            active.update(db).await?;

            let notice = ModerationNotice {
                store_name: &store.name,
                vendor_email: &store.contact_email,
                content_type: ContentKind::Product.as_str(),
                content_name: &product.name,
                reason: &degraded.reason,
                categories: &degraded.categories,
            };
            notification_service::send_moderation_alert(mailer, admin_email, &notice).await;

            return Ok(ScreenOutcome {
                action: ModerationAction::None,
                severity: Severity::None,
                is_violation: false,
                reason: Some(degraded.reason),
                degraded: true,
            });
        }
    };

    let severity = Severity::parse(&result.severity);
    record_check(db, ContentKind::Product, store.id, Some(product.id), &result).await?;

    let action = decide_action(ContentKind::Product, result.is_violation, severity);
    match action {
        ModerationAction::Flag => {
            let mut active: product::ActiveModel = product.clone().into();
            active.moderation_status = Set("flagged".to_owned());
            active.updated_at = Set(chrono::Utc::now().to_rfc3339());
            active.update(db).await?;
        }
        ModerationAction::Hide => {
            let mut active: product::ActiveModel = product.clone().into();
            active.moderation_status = Set("hidden".to_owned());
            active.active = Set(false);
            active.updated_at = Set(chrono::Utc::now().to_rfc3339());
            active.update(db).await?;
            tracing::warn!(
                "Auto-hid product {} ('{}') after severe violation: {}",
                product.id,
                product.name,
                result.reason
            );
        }
        ModerationAction::None | ModerationAction::Suspend => {}
    }

    if action != ModerationAction::None {
        let notice = ModerationNotice {
            store_name: &store.name,
            vendor_email: &store.contact_email,
            content_type: ContentKind::Product.as_str(),
            content_name: &product.name,
            reason: &result.reason,
            categories: &result.categories,
        };
        notification_service::send_moderation_alert(mailer, admin_email, &notice).await;
        match action {
            ModerationAction::Flag => {
                notification_service::send_content_flagged(mailer, &notice).await
            }
            _ => notification_service::send_content_hidden(mailer, &notice).await,
        }
    }

    Ok(ScreenOutcome {
        action,
        severity,
        is_violation: result.is_violation,
        reason: result.is_violation.then(|| result.reason.clone()),
        degraded: false,
    })
}

/// Screen a store's profile text and enforce the decided action
/// (suspension on severe violations).
pub async fn screen_store_content(
    db: &DatabaseConnection,
    screener: &ScreenerClient,
    mailer: &Mailer,
    admin_email: &str,
    store: &store::Model,
) -> Result<ScreenOutcome, ServiceError> {
    let description = store.description.clone().unwrap_or_default();
    let maker_bio = store.maker_bio.clone().unwrap_or_default();
    let welcome_message = store.welcome_message.clone().unwrap_or_default();
    let fields = [
        ("name", store.name.as_str()),
        ("description", description.as_str()),
        ("maker_bio", maker_bio.as_str()),
        ("welcome_message", welcome_message.as_str()),
    ];

    let result = match screener.screen(ContentKind::Store.as_str(), &fields).await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(
                "Moderation screener unavailable for store {}: {} (queued for manual review)",
                store.id,
                e
            );
            let degraded = degraded_result(&e);
            record_check(db, ContentKind::Store, store.id, None, &degraded).await?;

            let notice = ModerationNotice {
                store_name: &store.name,
                vendor_email: &store.contact_email,
                content_type: ContentKind::Store.as_str(),
                content_name: &store.name,
                reason: &degraded.reason,
                categories: &degraded.categories,
            };
            notification_service::send_moderation_alert(mailer, admin_email, &notice).await;

            return Ok(ScreenOutcome {
                action: ModerationAction::None,
                severity: Severity::None,
                is_violation: false,
                reason: Some(degraded.reason),
                degraded: true,
            });
        }
    };

    let severity = Severity::parse(&result.severity);
    record_check(db, ContentKind::Store, store.id, None, &result).await?;

    let action = decide_action(ContentKind::Store, result.is_violation, severity);
    if action == ModerationAction::Suspend {
        let mut active: store::ActiveModel = store.clone().into();
        active.status = Set("suspended".to_owned());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(db).await?;
        tracing::warn!(
            "Auto-suspended store {} ('{}') after severe violation: {}",
            store.id,
            store.name,
            result.reason
        );
    }

    if action != ModerationAction::None {
        let notice = ModerationNotice {
            store_name: &store.name,
            vendor_email: &store.contact_email,
            content_type: ContentKind::Store.as_str(),
            content_name: &store.name,
            reason: &result.reason,
            categories: &result.categories,
        };
        notification_service::send_moderation_alert(mailer, admin_email, &notice).await;
        match action {
            ModerationAction::Flag => {
                notification_service::send_content_flagged(mailer, &notice).await
            }
            _ => notification_service::send_content_hidden(mailer, &notice).await,
        }
    }

    Ok(ScreenOutcome {
        action,
        severity,
        is_violation: result.is_violation,
        reason: result.is_violation.then(|| result.reason.clone()),
        degraded: false,
    })
}

/// Screen proposed (not yet live) content to grade a change request for
/// the admin triage queue. Logs the check but never enforces: the
/// content only goes live if an admin approves the request.
pub async fn screen_for_review(
    db: &DatabaseConnection,
    screener: &ScreenerClient,
    kind: ContentKind,
    store_id: i32,
    product_id: Option<i32>,
    fields: &[(&str, &str)],
) -> Result<Severity, ServiceError> {
    match screener.screen(kind.as_str(), fields).await {
        Ok(result) => {
            let severity = Severity::parse(&result.severity);
            record_check(db, kind, store_id, product_id, &result).await?;
            Ok(severity)
        }
        Err(e) => {
            tracing::warn!(
                "Moderation screener unavailable during change-request submission: {}",
                e
            );
            let degraded = degraded_result(&e);
            record_check(db, kind, store_id, product_id, &degraded).await?;
            Ok(Severity::None)
        }
    }
}

fn degraded_result(err: &str) -> ScreeningResult {
    ScreeningResult {
        is_violation: false,
        severity: "none".to_owned(),
        categories: Vec::new(),
        reason: format!("screener unavailable: {}; queued for manual review", err),
        confidence: 0.0,
    }
}

/// Append one moderation_log row. Exactly one row is written per
/// screener check, violation or not.
async fn record_check(
    db: &DatabaseConnection,
    kind: ContentKind,
    store_id: i32,
    product_id: Option<i32>,
    result: &ScreeningResult,
) -> Result<(), ServiceError> {
    let entry = moderation_log::ActiveModel {
        content_type: Set(kind.as_str().to_owned()),
        store_id: Set(store_id),
        product_id: Set(product_id),
        is_violation: Set(result.is_violation),
        severity: Set(Severity::parse(&result.severity).as_str().to_owned()),
        categories: Set(serde_json::to_string(&result.categories).unwrap_or_else(|_| "[]".into())),
        reason: Set(result.reason.clone()),
        confidence: Set(result.confidence),
        checked_at: Set(chrono::Utc::now().to_rfc3339()),
        ..Default::default()
    };
    entry.insert(db).await?;
    Ok(())
}
