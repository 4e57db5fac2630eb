//! HistoryClient - recent runs from the remote query endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use yodash_core::config::DashConfig;
use yodash_core::model::HistoryEntry;
use yodash_core::ports::HistoryPort;
use yodash_core::{DashError, Result};

use crate::http::{build_client, check_status, transport_error};

/// Client for `POST /query`.
#[derive(Clone)]
pub struct HistoryClient {
    client: Client,
    endpoint: String,
}

#[derive(Serialize)]
struct HistoryRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a str>,
}

#[derive(Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    recent_runs: Option<Vec<HistoryEntry>>,
}

impl HistoryClient {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &DashConfig) -> Result<Self> {
        Self::new(config.history_url.clone(), config.request_timeout())
    }
}

#[async_trait]
impl HistoryPort for HistoryClient {
    async fn query(&self, user: Option<&str>) -> Result<Vec<HistoryEntry>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&HistoryRequest { user })
            .send()
            .await
            .map_err(|err| transport_error("History query", err))?;

        check_status(&response)?;

        let parsed: HistoryResponse = response.json().await.map_err(|err| {
            if err.is_decode() {
                DashError::decode(format!("Failed to parse history response: {err}"))
            } else {
                transport_error("Reading history response", err)
            }
        })?;

        let runs = parsed.recent_runs.unwrap_or_default();
        tracing::debug!("[HistoryClient] Received {} recent runs", runs.len());
        Ok(runs)
    }
}
