//! HTTP client for the transactional-email service.
//!
//! Sending is best-effort: callers log failures and move on, the
//! moderation action itself is the source of truth.

use serde_json::{json, Value};

const USER_AGENT: &str = "Makerstreet/1.0 (notifications)";

#[derive(Clone)]
pub struct Mailer {
    base_url: Option<String>,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl Mailer {
    /// A mailer with no base URL is disabled; sends become debug-logged no-ops.
    pub fn new(base_url: Option<String>, api_key: Option<String>) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .map_err(|e| format!("Failed to build client: {}", e))?;

        Ok(Self {
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
            api_key,
            client,
        })
    }

    pub async fn send(
        &self,
        to: &str,
        subject: &str,
        template: &str,
        context: Value,
    ) -> Result<(), String> {
        let Some(base_url) = &self.base_url else {
            tracing::debug!("Mailer disabled, skipping '{}' to {}", template, to);
            return Ok(());
        };

        let url = format!("{}/messages", base_url);
        let mut request = self.client.post(&url).json(&json!({
            "to": to,
            "subject": subject,
            "template": template,
            "context": context,
        }));

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| format!("Mail request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("Mail service returned status {}", response.status()));
        }

        Ok(())
    }
}
