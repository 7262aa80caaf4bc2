//! HTTP client for the bot's JSON API
//!
//! One GET per dashboard section. Responses are decoded into the typed
//! snapshots from [`crate::models`]; a non-OK status or a malformed body
//! becomes a typed error naming the endpoint instead of failing deep inside
//! rendering. No request timeout and no retry: a hung endpoint simply leaves
//! its section stale until the next cycle.

use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;

use crate::errors::{DashboardError, DashboardResult};
use crate::models::{
    BotStatusSnapshot, HealthStatus, IndicatorSnapshot, PerformanceSnapshot, RiskSnapshot,
    TradesResponse,
};

/// Read-only view over the bot's API
///
/// The refresh orchestrator is generic over this trait, which keeps it
/// testable against a stub without a running bot.
#[async_trait]
pub trait BotApi {
    async fn status(&self) -> DashboardResult<BotStatusSnapshot>;
    async fn indicators(&self) -> DashboardResult<IndicatorSnapshot>;
    async fn performance(&self) -> DashboardResult<PerformanceSnapshot>;
    async fn risk(&self) -> DashboardResult<RiskSnapshot>;
    async fn trades(&self, limit: u32, mode: Option<&str>) -> DashboardResult<TradesResponse>;
}

/// reqwest-backed client for the bot's HTTP API
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the API at `base_url` (e.g. `http://localhost:5900`)
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Probe the bot's health endpoint
    pub async fn health(&self) -> DashboardResult<HealthStatus> {
        self.get_json("/health", format!("{}/health", self.base_url))
            .await
    }

    fn trades_url(&self, limit: u32, mode: Option<&str>) -> String {
        let mut url = format!("{}/api/trades?limit={limit}", self.base_url);
        if let Some(mode) = mode {
            url.push_str("&mode=");
            url.push_str(mode);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: String,
    ) -> DashboardResult<T> {
        debug!("GET {url}");
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| DashboardError::Request { endpoint, source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DashboardError::Status { endpoint, status });
        }

        resp.json::<T>()
            .await
            .map_err(|source| DashboardError::Decode { endpoint, source })
    }
}

#[async_trait]
impl BotApi for ApiClient {
    async fn status(&self) -> DashboardResult<BotStatusSnapshot> {
        self.get_json("/api/status", format!("{}/api/status", self.base_url))
            .await
    }

    async fn indicators(&self) -> DashboardResult<IndicatorSnapshot> {
        self.get_json("/api/adx", format!("{}/api/adx", self.base_url))
            .await
    }

    async fn performance(&self) -> DashboardResult<PerformanceSnapshot> {
        self.get_json(
            "/api/performance",
            format!("{}/api/performance", self.base_url),
        )
        .await
    }

    async fn risk(&self) -> DashboardResult<RiskSnapshot> {
        self.get_json("/api/risk", format!("{}/api/risk", self.base_url))
            .await
    }

    async fn trades(&self, limit: u32, mode: Option<&str>) -> DashboardResult<TradesResponse> {
        self.get_json("/api/trades", self.trades_url(limit, mode))
            .await
    }
}
