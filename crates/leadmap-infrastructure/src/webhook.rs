//! Automation webhook client.

use std::time::Duration;

use async_trait::async_trait;
use leadmap_core::automation::{AutomationRequest, AutomationTrigger};
use leadmap_core::config::AutomationConfig;
use reqwest::Client;

/// Posts automation requests to the configured webhook.
#[derive(Debug, Clone)]
pub struct WebhookAutomationTrigger {
    client: Client,
    url: String,
    form_mode: String,
    timeout: Duration,
}

impl WebhookAutomationTrigger {
    pub fn new(url: impl Into<String>, form_mode: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            form_mode: form_mode.into(),
            timeout,
        }
    }

    pub fn from_config(config: &AutomationConfig) -> Self {
        Self::new(
            config.webhook_url.clone(),
            config.form_mode.clone(),
            config.request_timeout(),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AutomationTrigger for WebhookAutomationTrigger {
    async fn trigger(&self, request: &AutomationRequest) -> bool {
        let payload = request.payload(&self.form_mode);
        tracing::info!(
            "[Webhook] Triggering automation term={:?} city={:?}",
            request.term(),
            request.city()
        );

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => {
                tracing::debug!("[Webhook] Accepted with status {}", response.status());
                true
            }
            Ok(response) => {
                tracing::error!("[Webhook] Rejected with status {}", response.status());
                false
            }
            Err(e) => {
                tracing::error!("[Webhook] Request failed: {}", e);
                false
            }
        }
    }
}
