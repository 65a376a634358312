//! Notification Service - templated moderation emails
//!
//! All sends are best-effort: a failed send is logged and swallowed,
//! never rolled back into the moderation action that triggered it.

use serde_json::{json, Value};

use crate::mailer::Mailer;

/// Context shared by the three moderation templates.
pub struct ModerationNotice<'a> {
    pub store_name: &'a str,
    pub vendor_email: &'a str,
    pub content_type: &'a str,
    pub content_name: &'a str,
    pub reason: &'a str,
    pub categories: &'a [String],
}

fn template_context(notice: &ModerationNotice<'_>) -> Value {
    json!({
        "store_name": notice.store_name,
        "content_type": notice.content_type,
        "content_name": notice.content_name,
        "reason": notice.reason,
        "categories": notice.categories,
    })
}

/// Heads-up to the platform moderation inbox.
pub async fn send_moderation_alert(mailer: &Mailer, admin_email: &str, notice: &ModerationNotice<'_>) {
    let subject = format!(
        "Moderation alert: {} '{}' in {}",
        notice.content_type, notice.content_name, notice.store_name
    );
    if let Err(e) = mailer
        .send(admin_email, &subject, "moderation_alert", template_context(notice))
        .await
    {
        tracing::warn!("Failed to send moderation alert email: {}", e);
    }
}

/// Advisory note to the vendor: content stays up, but was flagged.
pub async fn send_content_flagged(mailer: &Mailer, notice: &ModerationNotice<'_>) {
    let subject = format!(
        "Your {} '{}' was flagged for review",
        notice.content_type, notice.content_name
    );
    if let Err(e) = mailer
        .send(
            notice.vendor_email,
            &subject,
            "content_flagged",
            template_context(notice),
        )
        .await
    {
        tracing::warn!("Failed to send content-flagged email: {}", e);
    }
}

/// Tells the vendor their content was taken off the storefront.
pub async fn send_content_hidden(mailer: &Mailer, notice: &ModerationNotice<'_>) {
    let subject = format!(
        "Your {} '{}' has been hidden",
        notice.content_type, notice.content_name
    );
    if let Err(e) = mailer
        .send(
            notice.vendor_email,
            &subject,
            "content_hidden",
            template_context(notice),
        )
        .await
    {
        tracing::warn!("Failed to send content-hidden email: {}", e);
    }
}
