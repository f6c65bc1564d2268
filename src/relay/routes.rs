//! Relay route handlers.
//!
//! `GET /api/proxy?type=dynasty|redraft` forwards to the upstream value API
//! and returns its JSON body unchanged, with a shared-cache header so
//! browsers and CDNs hold it for a day.

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

use crate::values::LeagueFormat;

pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://dynasty-daddy.com/api/v1/values";
pub const DEFAULT_CACHE_MAX_AGE_SECS: u64 = 86_400;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

pub struct RelayState {
    http: Client,
    upstream_base_url: String,
    cache_max_age_secs: u64,
}

impl RelayState {
    pub fn new(upstream_base_url: impl Into<String>, cache_max_age_secs: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("rookie-ledger-relay/0.1.0")
            .build()
            .context("Failed to build HTTP client for relay")?;

        Ok(Self {
            http,
            upstream_base_url: upstream_base_url.into().trim_end_matches('/').to_string(),
            cache_max_age_secs,
        })
    }

    fn cache_control(&self) -> String {
        format!("public, max-age={}", self.cache_max_age_secs)
    }

    async fn fetch_upstream(&self, format: LeagueFormat) -> Result<serde_json::Value> {
        let url = format!("{}/{}", self.upstream_base_url, format.as_param());
        debug!(url = %url, "Relaying trade value request");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .context("Upstream value request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("Upstream value API returned {}", resp.status());
        }

        resp.json()
            .await
            .context("Failed to parse upstream value response")
    }
}

pub type AppState = Arc<RelayState>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/proxy?type=dynasty|redraft
pub async fn proxy(State(state): State<AppState>, Query(query): Query<ProxyQuery>) -> Response {
    let Some(format) = query.kind.as_deref().and_then(LeagueFormat::from_param) else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid type parameter");
    };

    match state.fetch_upstream(format).await {
        Ok(body) => (
            StatusCode::OK,
            [(header::CACHE_CONTROL, state.cache_control())],
            Json(body),
        )
            .into_response(),
        Err(e) => {
            error!(kind = format.as_param(), error = %e, "Proxy error");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch trade values")
        }
    }
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
