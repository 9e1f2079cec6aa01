//! バックエンド死活確認（1回のみ）

use crate::transport::{HttpRequest, Transport};
use serde::Serialize;

/// 死活状態
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub is_healthy: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for HealthStatus {
    /// 確認前
    fn default() -> Self {
        Self {
            is_healthy: false,
            is_loading: true,
            error: None,
        }
    }
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            is_healthy: true,
            is_loading: false,
            error: None,
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            is_healthy: false,
            is_loading: false,
            error: Some(error.into()),
        }
    }
}

/// ベースURLへGETし、2xxなら正常
pub async fn check_health<T: Transport>(transport: &T, base_url: &str) -> HealthStatus {
    match transport.send(&HttpRequest::get(base_url)).await {
        Ok(response) if response.is_success() => HealthStatus::healthy(),
        Ok(response) => {
            HealthStatus::unhealthy(format!("Backend not responding ({})", response.status))
        }
        Err(e) => {
            tracing::debug!(url = base_url, error = %e, "health check failed");
            HealthStatus::unhealthy(e.to_string())
        }
    }
}
