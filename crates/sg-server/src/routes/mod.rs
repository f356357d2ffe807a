//! Route table. Legacy `/api/...` paths from the original service map onto
//! the same handlers.

pub mod health;
pub mod project;
pub mod scan;

use crate::state::SharedState;
use axum::routing::{get, post};
use axum::Router;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/scan/static-analysis", post(scan::static_analysis))
        .route("/scan/vulnerability", post(scan::vulnerability))
        .route("/project-info", get(project::project_info))
        .route("/api/sonar/scan", post(scan::static_analysis))
        .route("/api/trivy/scan", post(scan::vulnerability))
        .route("/api/sonar/project", get(project::project_info))
}
