//! Row-store adapters (REST over the hosted Postgres).

use async_trait::async_trait;
use leadmap_core::auth::{Profile, ProfileRepository};
use leadmap_core::error::{LeadmapError, Result};
use leadmap_core::lead::{Lead, LeadRepository};
use reqwest::Method;

use super::client::{SupabaseClient, error_message};

/// Reads the lead table.
#[derive(Clone)]
pub struct PostgrestLeadRepository {
    client: SupabaseClient,
    table: String,
}

impl PostgrestLeadRepository {
    pub fn new(client: SupabaseClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

#[async_trait]
impl LeadRepository for PostgrestLeadRepository {
    async fn fetch_all(&self) -> Result<Vec<Lead>> {
        let url = self.client.rest_url(&self.table);
        tracing::debug!("[LeadRepository] GET {}", url);

        let request = self
            .client
            .request(Method::GET, &url)
            .await
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        let response = self.client.send(request).await?;

        if !response.status().is_success() {
            let (status, message) = error_message(response).await;
            tracing::error!("[LeadRepository] fetch failed ({}): {}", status, message);
            return Err(LeadmapError::data_access(message));
        }

        let leads: Vec<Lead> = response.json().await.map_err(LeadmapError::from)?;
        tracing::debug!("[LeadRepository] fetched {} leads", leads.len());
        Ok(leads)
    }
}

/// Reads and updates user profiles.
#[derive(Clone)]
pub struct PostgrestProfileRepository {
    client: SupabaseClient,
    table: String,
}

impl PostgrestProfileRepository {
    pub fn new(client: SupabaseClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

#[async_trait]
impl ProfileRepository for PostgrestProfileRepository {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<Profile>> {
        let url = self.client.rest_url(&self.table);
        let id_filter = format!("eq.{user_id}");
        tracing::debug!("[ProfileRepository] fetching profile for user {}", user_id);

        let request = self
            .client
            .request(Method::GET, &url)
            .await
            .query(&[("select", "*"), ("id", id_filter.as_str())]);
        let response = self.client.send(request).await?;

        if !response.status().is_success() {
            let (_, message) = error_message(response).await;
            return Err(LeadmapError::data_access(message));
        }

        let rows: Vec<Profile> = response.json().await.map_err(LeadmapError::from)?;
        Ok(rows.into_iter().next())
    }

    async fn update_name(&self, user_id: &str, display_name: &str) -> Result<()> {
        let url = self.client.rest_url(&self.table);
        let id_filter = format!("eq.{user_id}");

        let request = self
            .client
            .request(Method::PATCH, &url)
            .await
            .query(&[("id", id_filter.as_str())])
            .header("Prefer", "return=minimal")
            .json(&serde_json::json!({ "nome": display_name }));
        let response = self.client.send(request).await?;

        if !response.status().is_success() {
            let (_, message) = error_message(response).await;
            return Err(LeadmapError::data_access(message));
        }
        Ok(())
    }
}
