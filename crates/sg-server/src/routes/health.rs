//! `GET /health` — liveness of the service and of each external collaborator.

use crate::state::SharedState;
use axum::extract::State;
use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sg_core::tool::ToolKind;
use sg_remote::check_remote_health;
use sg_tool_executor::tool_available;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub services: BTreeMap<&'static str, bool>,
}

/// Always 200; collaborator failures only flip their entry in `services`.
pub async fn health(State(state): State<SharedState>) -> Json<HealthReport> {
    let (remote_up, scanner_up) = tokio::join!(
        check_remote_health(&state.remote),
        tool_available(&state.config.vulnerability, state.config.probe_timeout),
    );

    let mut services = BTreeMap::new();
    services.insert(ToolKind::StaticAnalysis.service_name(), remote_up);
    services.insert(ToolKind::VulnerabilityScanner.service_name(), scanner_up);

    Json(HealthReport {
        status: "healthy",
        timestamp: Utc::now(),
        services,
    })
}
