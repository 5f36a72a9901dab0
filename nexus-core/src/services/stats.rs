//! Stats service client for the system telemetry endpoint

use async_trait::async_trait;

use super::ApiError;
use crate::telemetry::RawStats;

#[async_trait]
pub trait StatsApi: Send + Sync {
    /// Fetch the latest raw stats sample. Transport failures, error
    /// statuses, null payloads and malformed bodies all surface as
    /// `Err`; the telemetry feed treats them identically.
    async fn get_system_stats(&self) -> Result<RawStats, ApiError>;
}

pub struct HttpStatsService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStatsService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl StatsApi for HttpStatsService {
    async fn get_system_stats(&self) -> Result<RawStats, ApiError> {
        let url = format!("{}/system-stats", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }

        // The endpoint answers `null` when it has nothing to report
        match response.json::<Option<RawStats>>().await {
            Ok(Some(raw)) => Ok(raw),
            Ok(None) => Err(ApiError::Setup("stats endpoint returned null".into())),
            Err(e) => Err(ApiError::Setup(e.to_string())),
        }
    }
}
