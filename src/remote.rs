// Remote player table client.
//
// The roster lives in a PostgREST-style table service (collection
// `fantasy_players`). Query parameters come from `RosterQuery::to_params()`;
// this module only does transport and row validation. The `PlayerSource`
// trait is the seam the dashboard logic is tested through.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{DashboardError, Result};
use crate::player::{validate_rows, Player};
use crate::query::RosterQuery;

/// Anything that can resolve a roster query into an ordered player slice.
#[async_trait]
pub trait PlayerSource: Send + Sync {
    async fn fetch(&self, query: &RosterQuery) -> Result<Vec<Player>>;
}

/// HTTP client for the remote table service.
pub struct RemoteTableClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

/// The collection holding the player rows.
const PLAYERS_TABLE: &str = "fantasy_players";

impl RemoteTableClient {
    /// `base_url` is the service root (e.g. `https://xyz.supabase.co`);
    /// `anon_key` is the public API key sent with every request.
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, PLAYERS_TABLE)
    }
}

#[async_trait]
impl PlayerSource for RemoteTableClient {
    /// Fetch the roster slice described by `query`. Any transport or
    /// service failure maps to `DataUnavailable`; callers keep the
    /// last-known-good slice on that error instead of clearing the view.
    async fn fetch(&self, query: &RosterQuery) -> Result<Vec<Player>> {
        let params = query.to_params();
        debug!(?params, "fetching roster slice");

        let response = self
            .http
            .get(self.table_url())
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .query(&params)
            .send()
            .await
            .map_err(|e| DashboardError::DataUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DashboardError::DataUnavailable(format!(
                "{status}: {body}"
            )));
        }

        let rows: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| DashboardError::DataUnavailable(e.to_string()))?;

        // Malformed rows (null ids) are dropped here, not surfaced as
        // records with no identity.
        Ok(validate_rows(rows))
    }
}
