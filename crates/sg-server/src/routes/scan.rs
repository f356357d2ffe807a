//! Scan endpoints: run an external tool and return its normalized envelope.
//!
//! 200 means the tool ran (findings or not); 500 means the invocation itself
//! failed (spawn error or timeout).

use crate::error::ApiError;
use crate::state::SharedState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use sg_core::envelope::ScanEnvelope;
use sg_core::invocation::{InvocationRequest, OutputFormat};
use sg_core::tool::ToolKind;
use sg_tool_executor::{invoke, normalize, ExecutorError};
use tracing::Instrument;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Vulnerability scan request
// ---------------------------------------------------------------------------

const DEFAULT_TARGET: &str = "app:latest";
const DEFAULT_PATH: &str = ".";

/// Body of `POST /scan/vulnerability`. Every field is optional.
///
/// `image` / `type` are accepted for clients of the legacy `/api/trivy/scan` route.
/// A body carrying both a name and its legacy alias is ambiguous and rejected
/// as a duplicate field (400) rather than resolved by precedence.
#[derive(Debug, Default, Deserialize)]
pub struct VulnerabilityScanRequest {
    #[serde(default, alias = "image")]
    pub target: Option<String>,
    #[serde(default, alias = "type")]
    pub mode: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    Image,
    Filesystem,
}

impl ScanMode {
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        match raw {
            "image" => Ok(ScanMode::Image),
            "filesystem" | "fs" => Ok(ScanMode::Filesystem),
            other => Err(ApiError::Validation(format!(
                "invalid mode '{other}': expected \"image\" or \"filesystem\""
            ))),
        }
    }
}

impl VulnerabilityScanRequest {
    /// Parse a request body; an empty body means all defaults.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| ApiError::Validation(format!("invalid request body: {e}")))
    }

    /// Scanner arguments for this request, after validating `mode`.
    pub fn scanner_args(&self) -> Result<Vec<String>, ApiError> {
        let mode = match self.mode.as_deref() {
            Some(raw) => ScanMode::parse(raw)?,
            None => ScanMode::Image,
        };
        let args = match mode {
            ScanMode::Image => vec![
                "image".to_string(),
                "--format".into(),
                "json".into(),
                self.target.clone().unwrap_or_else(|| DEFAULT_TARGET.into()),
            ],
            ScanMode::Filesystem => vec![
                "fs".to_string(),
                "--format".into(),
                "json".into(),
                self.path.clone().unwrap_or_else(|| DEFAULT_PATH.into()),
            ],
        };
        Ok(args)
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `POST /scan/static-analysis`: run the static-analysis scanner with its defaults.
pub async fn static_analysis(
    State(state): State<SharedState>,
) -> Result<(StatusCode, Json<ScanEnvelope>), ApiError> {
    let argv = state.config.static_analysis.argv_with(Vec::<String>::new());
    run_scan(&state, ToolKind::StaticAnalysis, argv, OutputFormat::None).await
}

/// `POST /scan/vulnerability`: run the vulnerability scanner on an image or path.
pub async fn vulnerability(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ScanEnvelope>), ApiError> {
    let request = VulnerabilityScanRequest::from_body(&body)?;
    let argv = state.config.vulnerability.argv_with(request.scanner_args()?);
    run_scan(&state, ToolKind::VulnerabilityScanner, argv, OutputFormat::Json).await
}

async fn run_scan(
    state: &SharedState,
    kind: ToolKind,
    argv: Vec<String>,
    format: OutputFormat,
) -> Result<(StatusCode, Json<ScanEnvelope>), ApiError> {
    let scan_id = Uuid::new_v4();
    let span = tracing::info_span!("scan", %scan_id, tool = kind.service_name());

    async move {
        let request = InvocationRequest::new(argv, state.config.scan_timeout)
            .map_err(|e| ExecutorError::Execution(e.to_string()))?;
        let result = invoke(&request).await?;
        let envelope = normalize(&result, format);

        tracing::info!(
            success = envelope.success,
            exit_status = ?result.exit_status,
            timed_out = result.timed_out,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "scan finished"
        );

        let status = if result.timed_out {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        };
        Ok::<_, ApiError>((status, Json(envelope)))
    }
    .instrument(span)
    .await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_uses_defaults() {
        let req = VulnerabilityScanRequest::from_body(b"").unwrap();
        assert_eq!(
            req.scanner_args().unwrap(),
            vec!["image", "--format", "json", "app:latest"]
        );
        let req = VulnerabilityScanRequest::from_body(b"  \n").unwrap();
        assert!(req.mode.is_none());
    }

    #[test]
    fn filesystem_mode_uses_path() {
        let req =
            VulnerabilityScanRequest::from_body(br#"{"mode": "filesystem", "path": "/src"}"#)
                .unwrap();
        assert_eq!(req.scanner_args().unwrap(), vec!["fs", "--format", "json", "/src"]);

        let req = VulnerabilityScanRequest::from_body(br#"{"mode": "filesystem"}"#).unwrap();
        assert_eq!(req.scanner_args().unwrap().last().unwrap(), ".");
    }

    #[test]
    fn legacy_field_names_are_accepted() {
        let req =
            VulnerabilityScanRequest::from_body(br#"{"image": "nginx:1.25", "type": "image"}"#)
                .unwrap();
        assert_eq!(req.scanner_args().unwrap().last().unwrap(), "nginx:1.25");

        let req = VulnerabilityScanRequest::from_body(br#"{"type": "fs", "path": "/repo"}"#).unwrap();
        assert_eq!(req.scanner_args().unwrap()[0], "fs");
    }

    #[test]
    fn field_and_legacy_alias_together_are_rejected() {
        for body in [
            br#"{"target": "a:1", "image": "b:2"}"#.as_slice(),
            br#"{"mode": "image", "type": "fs"}"#.as_slice(),
        ] {
            let err = VulnerabilityScanRequest::from_body(body).unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)));
            assert!(err.to_string().contains("duplicate field"), "{err}");
        }
    }

    #[test]
    fn unknown_mode_names_the_field() {
        let req = VulnerabilityScanRequest::from_body(br#"{"mode": "network"}"#).unwrap();
        let err = req.scanner_args().unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(err.to_string().contains("mode"));
        assert!(err.to_string().contains("network"));
    }

    #[test]
    fn malformed_body_is_validation_error() {
        let err = VulnerabilityScanRequest::from_body(b"{not json").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        let err = VulnerabilityScanRequest::from_body(br#"{"mode": 3}"#).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[cfg(unix)]
    mod http {
        use crate::routes::test_support::{base_config, call, shell_tool};
        use axum::http::{Method, StatusCode};
        use std::time::Duration;

        #[tokio::test]
        async fn findings_exit_is_200_with_failed_envelope() {
            let mut config = base_config().await;
            config.vulnerability =
                shell_tool("trivy", r#"echo '{"vulnerabilities": []}'; exit 1"#);

            let (status, body) = call(
                config,
                Method::POST,
                "/scan/vulnerability",
                r#"{"mode": "filesystem", "path": "/src"}"#,
            )
            .await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["success"], false);
            assert_eq!(body["results"], serde_json::json!({"vulnerabilities": []}));
            assert!(body.get("raw_output").is_none());
            assert!(!body["error"].as_str().unwrap().is_empty());
            assert!(body["timestamp"].is_string());
        }

        #[tokio::test]
        async fn scanner_receives_mode_specific_args() {
            let mut config = base_config().await;
            config.vulnerability = shell_tool("trivy", r#"printf '{"args": "%s"}' "$*""#);

            let (status, body) = call(
                config.clone(),
                Method::POST,
                "/scan/vulnerability",
                r#"{"mode": "filesystem", "path": "/src"}"#,
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["success"], true);
            assert_eq!(body["results"]["args"], "fs --format json /src");
            assert!(body.get("error").is_none());

            let (_, body) = call(config, Method::POST, "/scan/vulnerability", "").await;
            assert_eq!(body["results"]["args"], "image --format json app:latest");
        }

        #[tokio::test]
        async fn invalid_mode_is_400_and_spawns_nothing() {
            let marker =
                std::env::temp_dir().join(format!("scangate-{}.ran", uuid::Uuid::new_v4()));
            let mut config = base_config().await;
            config.vulnerability =
                shell_tool("trivy", &format!("touch {}", marker.display()));

            let (status, body) = call(
                config,
                Method::POST,
                "/scan/vulnerability",
                r#"{"mode": "network"}"#,
            )
            .await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["success"], false);
            assert!(body["error"].as_str().unwrap().contains("mode"));
            assert!(body["timestamp"].is_string());
            assert!(!marker.exists());
        }

        #[tokio::test]
        async fn legacy_route_is_served() {
            let mut config = base_config().await;
            config.vulnerability = shell_tool("trivy", r#"echo 'not json at all'"#);

            let (status, body) =
                call(config, Method::POST, "/api/trivy/scan", r#"{"image": "app:1"}"#).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["success"], true);
            assert!(body.get("results").is_none());
            assert_eq!(body["raw_output"], "not json at all\n");
        }

        #[tokio::test]
        async fn static_analysis_returns_raw_log() {
            let mut config = base_config().await;
            config.static_analysis =
                shell_tool("sonar-scanner", r#"echo 'INFO: ANALYSIS SUCCESSFUL'"#);

            let (status, body) = call(config, Method::POST, "/scan/static-analysis", "").await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["success"], true);
            assert_eq!(body["raw_output"], "INFO: ANALYSIS SUCCESSFUL\n");
            assert!(body.get("results").is_none());
        }

        #[tokio::test]
        async fn static_analysis_failure_carries_stderr() {
            let mut config = base_config().await;
            config.static_analysis = shell_tool(
                "sonar-scanner",
                r#"echo 'INFO: Scanner configuration file: NONE'; echo 'ERROR: You must define sonar.projectKey' >&2; exit 2"#,
            );

            let (status, body) = call(config, Method::POST, "/scan/static-analysis", "").await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["success"], false);
            assert_eq!(body["error"], "ERROR: You must define sonar.projectKey");
            assert!(body["raw_output"].as_str().unwrap().contains("NONE"));
        }

        #[tokio::test]
        async fn timeout_is_500_with_timeout_message() {
            let mut config = base_config().await;
            config.scan_timeout = Duration::from_millis(300);
            config.static_analysis = shell_tool("sonar-scanner", "exec sleep 30");

            let (status, body) = call(config, Method::POST, "/scan/static-analysis", "").await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body["success"], false);
            assert!(body["error"].as_str().unwrap().contains("timed out"));
        }

        #[tokio::test]
        async fn missing_binary_is_500() {
            let mut config = base_config().await;
            config.vulnerability.program = "scangate-absent-trivy".into();

            let (status, body) = call(config, Method::POST, "/scan/vulnerability", "{}").await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body["success"], false);
            assert_eq!(
                body["error"],
                "failed to start scangate-absent-trivy: executable not found"
            );
        }

        #[tokio::test]
        async fn spawn_failure_does_not_leak_install_path() {
            let mut config = base_config().await;
            config.vulnerability.program = "/opt/internal/secret-dir/trivy".into();

            let (status, body) = call(config, Method::POST, "/scan/vulnerability", "{}").await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            let error = body["error"].as_str().unwrap();
            assert!(!error.contains("/opt/internal"), "{error}");
            assert!(!error.contains("os error"), "{error}");
            assert!(error.contains("trivy"));
        }

        #[tokio::test]
        async fn duplicate_legacy_key_is_400_and_spawns_nothing() {
            let marker =
                std::env::temp_dir().join(format!("scangate-{}.ran", uuid::Uuid::new_v4()));
            let mut config = base_config().await;
            config.vulnerability =
                shell_tool("trivy", &format!("touch {}", marker.display()));

            let (status, body) = call(
                config,
                Method::POST,
                "/scan/vulnerability",
                r#"{"target": "a:1", "image": "b:2"}"#,
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["success"], false);
            assert!(body["error"].as_str().unwrap().contains("duplicate field"));
            assert!(!marker.exists());
        }
    }
}
