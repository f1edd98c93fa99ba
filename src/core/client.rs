use anyhow::{Context, Result};

use crate::core::config::ApiConfig;
use crate::core::models::interaction::{Interaction, Paginated};
use crate::core::models::session::SessionSummary;

/// Query for an interaction page. Sorted newest-first like the log UI.
#[derive(Debug, Clone, Default)]
pub struct InteractionQuery {
    pub session_id: Option<String>,
    pub limit: u64,
    pub offset: u64,
}

/// Client for the interaction-log API.
pub struct LogClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl LogClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        validate_endpoint(&base_url)?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Fetch one page of interactions, optionally scoped to a session.
    pub async fn get_interactions(&self, query: &InteractionQuery) -> Result<Paginated<Interaction>> {
        let mut params: Vec<(&str, String)> = vec![
            ("limit", query.limit.to_string()),
            ("offset", query.offset.to_string()),
            ("sortBy", "createdAt".to_string()),
            ("sortDirection", "desc".to_string()),
        ];
        if let Some(session_id) = &query.session_id {
            params.push(("sessionId", session_id.clone()));
        }
        self.get_json("/api/interactions", &params)
            .await
            .context("Failed to fetch interactions")
    }

    /// Fetch the authoritative summary for one session. The API returns a
    /// paginated list; callers take the first element if any.
    pub async fn get_session_summary(&self, session_id: &str) -> Result<Option<SessionSummary>> {
        let params = [
            ("sessionId", session_id.to_string()),
            ("limit", "1".to_string()),
        ];
        let page: Paginated<SessionSummary> = self
            .get_json("/api/interaction-sessions", &params)
            .await
            .context("Failed to fetch session summary")?;
        Ok(page.data.into_iter().next())
    }

    async fn get_json<T, P>(&self, path: &str, params: &[(&str, P)]) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        P: serde::Serialize,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .get(&url)
            .query(params)
            .header("Accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            anyhow::bail!("Unauthorized: check api_key in the config file");
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("HTTP {}: {}", status.as_u16(), body);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }
}

/// Validate the API endpoint before sending credentials.
///
/// HTTPS is required except for loopback hosts; self-hosted log stores are
/// commonly reached over plain HTTP on localhost.
pub fn validate_endpoint(url: &str) -> Result<()> {
    if url.starts_with("https://") {
        return Ok(());
    }
    if let Some(rest) = url.strip_prefix("http://") {
        let authority = rest.split(['/', '?']).next().unwrap_or("");
        let host = authority.rsplit_once(':').map_or(authority, |(h, _)| h);
        if host == "localhost" || host == "127.0.0.1" || host == "[::1]" {
            return Ok(());
        }
        anyhow::bail!("endpoint must use HTTPS for non-local hosts, got: {}", url);
    }
    anyhow::bail!("endpoint must use http(s), got: {}", url)
}
