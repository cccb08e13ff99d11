//! Automation request and webhook payload.

use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};

use crate::error::{LeadmapError, Result};

/// Production endpoint of the lead-search automation.
pub const DEFAULT_WEBHOOK_URL: &str =
    "https://rapidus-n8n-webhook.b7bsm5.easypanel.host/webhook/busca_empresas";

/// Mode marker sent with every submission.
pub const DEFAULT_FORM_MODE: &str = "test";

/// A validated request to search for new leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationRequest {
    term: String,
    city: String,
}

impl AutomationRequest {
    /// Both the search term and the city are required.
    pub fn new(term: impl Into<String>, city: impl Into<String>) -> Result<Self> {
        let term = term.into();
        let city = city.into();

        if term.trim().is_empty() {
            return Err(LeadmapError::validation("search term is required"));
        }
        if city.trim().is_empty() {
            return Err(LeadmapError::validation("city is required"));
        }

        Ok(Self { term, city })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Builds the single-element payload, stamped with `now`.
    pub fn payload_at(&self, now: DateTime<FixedOffset>, form_mode: &str) -> Vec<WebhookPayload> {
        vec![WebhookPayload {
            search_term: self.term.to_lowercase(),
            city: self.city.to_lowercase(),
            submitted_at: format_submitted_at(now),
            form_mode: form_mode.to_string(),
        }]
    }

    /// Builds the payload stamped with the local wall clock.
    pub fn payload(&self, form_mode: &str) -> Vec<WebhookPayload> {
        self.payload_at(Local::now().fixed_offset(), form_mode)
    }
}

/// Body element expected by the automation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(rename = "Termo da Busca")]
    pub search_term: String,
    #[serde(rename = "Cidade")]
    pub city: String,
    #[serde(rename = "submittedAt")]
    pub submitted_at: String,
    #[serde(rename = "formMode")]
    pub form_mode: String,
}

/// ISO-8601 with milliseconds and a numeric offset, never `Z`:
/// `2026-01-21T09:54:48.213-03:00`.
pub fn format_submitted_at(now: DateTime<FixedOffset>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn recife_time() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 1, 21, 9, 54, 48)
            .unwrap()
            + chrono::Duration::milliseconds(213)
    }

    #[test]
    fn test_submitted_at_format() {
        assert_eq!(
            format_submitted_at(recife_time()),
            "2026-01-21T09:54:48.213-03:00"
        );
    }

    #[test]
    fn test_utc_uses_numeric_offset() {
        let utc = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 1, 21, 12, 0, 0)
            .unwrap();
        assert_eq!(format_submitted_at(utc), "2026-01-21T12:00:00.000+00:00");
    }

    #[test]
    fn test_payload_shape() {
        let request = AutomationRequest::new("Petshops", "Recife").unwrap();
        let payload = request.payload_at(recife_time(), DEFAULT_FORM_MODE);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "Termo da Busca": "petshops",
                "Cidade": "recife",
                "submittedAt": "2026-01-21T09:54:48.213-03:00",
                "formMode": "test"
            }])
        );
    }

    #[test]
    fn test_request_requires_both_fields() {
        assert!(AutomationRequest::new("", "Recife").unwrap_err().is_validation());
        assert!(AutomationRequest::new("Petshops", "  ").unwrap_err().is_validation());
    }
}
