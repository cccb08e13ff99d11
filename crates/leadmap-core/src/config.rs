use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::DEFAULT_MIN_PASSWORD_LEN;
use crate::automation::{DEFAULT_FORM_MODE, DEFAULT_WEBHOOK_URL};
use crate::error::{LeadmapError, Result};

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadmapConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub automation: AutomationConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
    #[serde(default = "default_leads_table")]
    pub leads_table: String,
    #[serde(default = "default_profiles_table")]
    pub profiles_table: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            leads_table: default_leads_table(),
            profiles_table: default_profiles_table(),
        }
    }
}

fn default_leads_table() -> String {
    "prospeccao".to_string()
}

fn default_profiles_table() -> String {
    "profiles".to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AutomationConfig {
    #[serde(default = "default_webhook_url")]
    pub webhook_url: String,
    #[serde(default = "default_form_mode")]
    pub form_mode: String,
    /// Delay before the one follow-up refresh after a successful submission
    #[serde(default = "default_refresh_delay_secs")]
    pub refresh_delay_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            webhook_url: default_webhook_url(),
            form_mode: default_form_mode(),
            refresh_delay_secs: default_refresh_delay_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AutomationConfig {
    pub fn refresh_delay(&self) -> Duration {
        Duration::from_secs(self.refresh_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_webhook_url() -> String {
    DEFAULT_WEBHOOK_URL.to_string()
}

fn default_form_mode() -> String {
    DEFAULT_FORM_MODE.to_string()
}

fn default_refresh_delay_secs() -> u64 {
    45
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Upper bound on session/profile resolution before loading is forced off
    #[serde(default = "default_resolution_timeout_secs")]
    pub resolution_timeout_secs: u64,
    #[serde(default = "default_true")]
    pub persist_session: bool,
    #[serde(default = "default_min_password_len")]
    pub min_password_len: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            resolution_timeout_secs: default_resolution_timeout_secs(),
            persist_session: true,
            min_password_len: default_min_password_len(),
        }
    }
}

impl AuthConfig {
    pub fn resolution_timeout(&self) -> Duration {
        Duration::from_secs(self.resolution_timeout_secs)
    }
}

fn default_resolution_timeout_secs() -> u64 {
    8
}

fn default_true() -> bool {
    true
}

fn default_min_password_len() -> usize {
    DEFAULT_MIN_PASSWORD_LEN
}

impl LeadmapConfig {
    /// Checks the values that cannot be defaulted.
    pub fn validate(&self) -> Result<()> {
        let url = self.backend.url.trim();
        if url.is_empty() {
            return Err(LeadmapError::config("backend.url is not set"));
        }
        if !is_http_url(url) {
            return Err(LeadmapError::config(format!(
                "backend.url must be an http(s) URL: {url}"
            )));
        }
        if self.backend.anon_key.trim().is_empty() {
            return Err(LeadmapError::config("backend.anon_key is not set"));
        }
        if !is_http_url(self.automation.webhook_url.trim()) {
            return Err(LeadmapError::config(format!(
                "automation.webhook_url must be an http(s) URL: {}",
                self.automation.webhook_url
            )));
        }
        if self.auth.resolution_timeout_secs == 0 {
            return Err(LeadmapError::config("auth.resolution_timeout_secs must be > 0"));
        }
        if self.automation.request_timeout_secs == 0 {
            return Err(LeadmapError::config(
                "automation.request_timeout_secs must be > 0",
            ));
        }
        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}
