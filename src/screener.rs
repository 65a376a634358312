//! HTTP client for the external content-classification service.
//!
//! Every create/update of store or product text fields goes through
//! `ScreenerClient::screen` before the caller decides what else to do.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const USER_AGENT: &str = "Makerstreet/1.0 (moderation)";

/// Classification verdict for one batch of text fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningResult {
    pub is_violation: bool,
    /// `none`, `moderate` or `severe`.
    pub severity: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Clone)]
pub struct ScreenerClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ScreenerClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .map_err(|e| format!("Failed to build client: {}", e))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    /// Submit text fields for classification.
    ///
    /// `content_type` is `store` or `product`; `fields` maps field names
    /// to the merged post-update text being checked.
    pub async fn screen(
        &self,
        content_type: &str,
        fields: &[(&str, &str)],
    ) -> Result<ScreeningResult, String> {
        let mut content = serde_json::Map::new();
        for (name, text) in fields {
            content.insert(name.to_string(), Value::String(text.to_string()));
        }

        let url = format!("{}/v1/screen", self.base_url);
        let mut request = self.client.post(&url).json(&json!({
            "content_type": content_type,
            "fields": content,
        }));

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| format!("Screener request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("Screener returned status {}", response.status()));
        }

        response
            .json::<ScreeningResult>()
            .await
            .map_err(|e| format!("Failed to parse screener response: {}", e))
    }
}
