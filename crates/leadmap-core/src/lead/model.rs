//! Lead domain model.
//!
//! A lead is a prospective business contact captured by the external
//! automation. The client only ever reads leads; the backend owns them.

use serde::{Deserialize, Serialize};

/// A single prospect row as stored by the backend.
///
/// Field names follow the backend's column names (`telefone`, `cidade`, ...),
/// the Rust names are the English equivalents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    /// Opaque unique identifier
    pub id: String,
    #[serde(rename = "telefone", default)]
    pub phone: String,
    #[serde(rename = "cidade", default)]
    pub city: Option<String>,
    #[serde(rename = "bairro", default)]
    pub neighborhood: Option<String>,
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "email2", default)]
    pub secondary_email: Option<String>,
    #[serde(rename = "segmento", default)]
    pub segment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Lead {
    /// Creates a lead with only the required fields set.
    pub fn new(id: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            phone: phone.into(),
            city: None,
            neighborhood: None,
            name: None,
            website: None,
            email: None,
            secondary_email: None,
            segment: None,
            created_at: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    pub fn with_neighborhood(mut self, neighborhood: impl Into<String>) -> Self {
        self.neighborhood = Some(neighborhood.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    /// Trimmed city name, `None` when missing or blank.
    pub fn city_key(&self) -> Option<&str> {
        non_blank(self.city.as_deref())
    }

    /// Trimmed segment name, `None` when missing or blank.
    pub fn segment_key(&self) -> Option<&str> {
        non_blank(self.segment.as_deref())
    }

    /// Name shown in lists; falls back to the phone number.
    pub fn display_name(&self) -> &str {
        non_blank(self.name.as_deref()).unwrap_or(&self.phone)
    }

    /// Website as an absolute link.
    ///
    /// Stored values are frequently bare hostnames (`loja.com.br`), so an
    /// `https://` scheme is prepended unless the value already starts with `http`.
    pub fn website_url(&self) -> Option<String> {
        let site = non_blank(self.website.as_deref())?;
        if site.starts_with("http") {
            Some(site.to_string())
        } else {
            Some(format!("https://{site}"))
        }
    }

    /// Primary then secondary email, skipping blanks.
    pub fn emails(&self) -> Vec<&str> {
        [self.email.as_deref(), self.secondary_email.as_deref()]
            .into_iter()
            .filter_map(non_blank)
            .collect()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_row() {
        let row = serde_json::json!({
            "id": "a1",
            "telefone": "+55 11 99999-0000",
            "cidade": " São Paulo ",
            "bairro": null,
            "nome": "Pet Feliz",
            "website": "petfeliz.com.br",
            "email": "contato@petfeliz.com.br",
            "email2": null,
            "segmento": "Pet Shop",
            "created_at": "2026-01-21T12:54:48.213+00:00"
        });

        let lead: Lead = serde_json::from_value(row).unwrap();
        assert_eq!(lead.id, "a1");
        assert_eq!(lead.city_key(), Some("São Paulo"));
        assert_eq!(lead.segment_key(), Some("Pet Shop"));
        assert_eq!(lead.neighborhood, None);
        assert_eq!(lead.website_url().as_deref(), Some("https://petfeliz.com.br"));
    }

    #[test]
    fn test_missing_optional_columns_default_to_none() {
        let lead: Lead = serde_json::from_str(r#"{"id":"x","telefone":"123"}"#).unwrap();
        assert_eq!(lead.city, None);
        assert_eq!(lead.display_name(), "123");
        assert!(lead.emails().is_empty());
    }

    #[test]
    fn test_website_with_scheme_is_kept() {
        let lead = Lead::new("1", "0").with_website("http://example.com");
        assert_eq!(lead.website_url().as_deref(), Some("http://example.com"));
    }

    #[test]
    fn test_blank_city_has_no_key() {
        let lead = Lead::new("1", "0").with_city("   ");
        assert_eq!(lead.city_key(), None);
    }

    #[test]
    fn test_emails_skip_blank_secondary() {
        let mut lead = Lead::new("1", "0").with_email("a@b.com");
        lead.secondary_email = Some(" ".to_string());
        assert_eq!(lead.emails(), vec!["a@b.com"]);
    }
}
