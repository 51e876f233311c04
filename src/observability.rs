use crate::routes::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Application health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthChecks {
    pub api: String,
    pub store: String,
}

/// Application metrics
#[derive(Debug, Clone)]
pub struct AppMetrics {
    pub start_time: Instant,
    pub total_requests: Arc<RwLock<u64>>,
    pub successful_requests: Arc<RwLock<u64>>,
    pub failed_requests: Arc<RwLock<u64>>,
    pub students_created: Arc<RwLock<u64>>,
    pub students_updated: Arc<RwLock<u64>>,
    pub students_deleted: Arc<RwLock<u64>>,
}

impl AppMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            total_requests: Arc::new(RwLock::new(0)),
            successful_requests: Arc::new(RwLock::new(0)),
            failed_requests: Arc::new(RwLock::new(0)),
            students_created: Arc::new(RwLock::new(0)),
            students_updated: Arc::new(RwLock::new(0)),
            students_deleted: Arc::new(RwLock::new(0)),
        }
    }

    pub async fn increment_requests(&self) {
        *self.total_requests.write().await += 1;
    }

    pub async fn increment_success(&self) {
        *self.successful_requests.write().await += 1;
    }

    pub async fn increment_failure(&self) {
        *self.failed_requests.write().await += 1;
    }

    pub async fn increment_created(&self) {
        *self.students_created.write().await += 1;
    }

    pub async fn increment_updated(&self) {
        *self.students_updated.write().await += 1;
    }

    pub async fn add_deleted(&self, count: u64) {
        *self.students_deleted.write().await += count;
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for AppMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts every request and whether it ended in a success status.
pub async fn track_requests(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    state.metrics.increment_requests().await;
    let response = next.run(request).await;

    if response.status().is_success() {
        state.metrics.increment_success().await;
    } else {
        state.metrics.increment_failure().await;
    }
    response
}

/// Health check endpoint handler
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime = state.metrics.uptime_seconds();

    let (status_code, status, store) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "healthy", "ok".to_string()),
        Err(e) => {
            warn!("Health check: store ping failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", e.to_string())
        }
    };

    let health = HealthStatus {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        checks: HealthChecks {
            api: "ok".to_string(),
            store,
        },
    };

    info!(
        "Health check requested - status: {}, uptime: {}s",
        status, uptime
    );
    (status_code, Json(health))
}

/// Metrics endpoint handler
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub uptime_seconds: u64,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub students_created: u64,
    pub students_updated: u64,
    pub students_deleted: u64,
    pub success_rate: f64,
}

pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let metrics = &state.metrics;
    let total = *metrics.total_requests.read().await;
    let success = *metrics.successful_requests.read().await;

    let success_rate = if total > 0 {
        (success as f64 / total as f64) * 100.0
    } else {
        100.0
    };

    let response = MetricsResponse {
        uptime_seconds: metrics.uptime_seconds(),
        total_requests: total,
        successful_requests: success,
        failed_requests: *metrics.failed_requests.read().await,
        students_created: *metrics.students_created.read().await,
        students_updated: *metrics.students_updated.read().await,
        students_deleted: *metrics.students_deleted.read().await,
        success_rate,
    };

    (StatusCode::OK, Json(response))
}

/// Directives used when `RUST_LOG` is unset or does not parse.
pub const DEFAULT_LOG_FILTER: &str = "student_records=info,tower_http=info";

fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs the global JSON subscriber. Event fields are flattened into the
/// top-level object so each log line reads as one flat record.
pub fn init_tracing() {
    let requested = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(requested.as_deref());
    let applied = filter.to_string();

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .with_target(false),
        )
        .init();

    info!(filter = %applied, "Tracing initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counters() {
        let metrics = AppMetrics::new();
        metrics.increment_requests().await;
        metrics.increment_requests().await;
        metrics.increment_failure().await;
        metrics.increment_created().await;
        metrics.add_deleted(0).await;
        metrics.add_deleted(1).await;

        assert_eq!(*metrics.total_requests.read().await, 2);
        assert_eq!(*metrics.failed_requests.read().await, 1);
        assert_eq!(*metrics.students_created.read().await, 1);
        assert_eq!(*metrics.students_deleted.read().await, 1);
    }

    #[test]
    fn test_log_filter_falls_back_to_default() {
        assert!(log_filter(None).to_string().contains("student_records=info"));
        assert!(log_filter(Some("student_records=notalevel"))
            .to_string()
            .contains("tower_http=info"));
        assert_eq!(log_filter(Some("warn")).to_string(), "warn");
    }
}
