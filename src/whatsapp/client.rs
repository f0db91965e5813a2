//! Outbound delivery through the Green API HTTP gateway.

use anyhow::Context;

const DEFAULT_BASE_URL: &str = "https://api.green-api.com";

/// Thin client for the instance-scoped Green API send endpoint.
#[derive(Clone)]
pub struct GreenApiClient {
    http: reqwest::Client,
    base_url: String,
    instance_id: String,
    api_token: String,
}

impl GreenApiClient {
    pub fn new(instance_id: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            instance_id: instance_id.into(),
            api_token: api_token.into(),
        }
    }

    /// Point the client at a different gateway host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Deliver `text` to a bare phone number (no `@c.us` suffix).
    pub async fn send_message(&self, phone: &str, text: &str) -> anyhow::Result<()> {
        // The endpoint path embeds the API token; keep it out of logs.
        let url = format!(
            "{}/waInstance{}/sendMessage/{}",
            self.base_url, self.instance_id, self.api_token
        );
        let body = serde_json::json!({
            "chatId": format!("{phone}@c.us"),
            "message": text,
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Green API request failed")?;
        response
            .error_for_status()
            .context("Green API rejected the message")?;

        tracing::info!("WhatsApp: message sent to {phone}");
        Ok(())
    }
}
