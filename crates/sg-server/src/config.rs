//! Process-wide configuration, read once from the environment at startup.

use sg_core::tool::{ToolCommand, ToolKind};
use sg_remote::RemoteConfig;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Immutable server configuration, shared with every handler through state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub remote: RemoteConfig,
    pub static_analysis: ToolCommand,
    pub vulnerability: ToolCommand,
    pub scan_timeout: Duration,
    /// Bound for `--version` liveness probes.
    pub probe_timeout: Duration,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (env, map, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen_raw = get("SCANGATE_LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:5000".into());
        let listen_addr = listen_raw.parse::<SocketAddr>().map_err(|e| {
            ConfigError::Invalid {
                key: "SCANGATE_LISTEN_ADDR",
                value: listen_raw.clone(),
                reason: e.to_string(),
            }
        })?;

        let probe_timeout = secs(&get, "SCANGATE_PROBE_TIMEOUT_SECS", 5)?;
        let remote = RemoteConfig {
            base_url: get("SONARQUBE_URL")
                .unwrap_or_else(|| "http://localhost:9000".into())
                .trim_end_matches('/')
                .to_string(),
            token: get("SONARQUBE_TOKEN"),
            project_key: get("SONAR_PROJECT_KEY").unwrap_or_else(|| "sonar-poc".into()),
            probe_timeout,
            request_timeout: secs(&get, "SCANGATE_REMOTE_TIMEOUT_SECS", 10)?,
        };

        let static_analysis = get("SONAR_SCANNER_BIN")
            .map(ToolCommand::new)
            .unwrap_or_else(|| ToolCommand::for_kind(ToolKind::StaticAnalysis));
        let vulnerability = get("TRIVY_BIN")
            .map(ToolCommand::new)
            .unwrap_or_else(|| ToolCommand::for_kind(ToolKind::VulnerabilityScanner));

        Ok(Self {
            listen_addr,
            remote,
            static_analysis,
            vulnerability,
            scan_timeout: secs(&get, "SCANGATE_SCAN_TIMEOUT_SECS", 300)?,
            probe_timeout,
        })
    }
}

fn secs<G>(get: &G, key: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let Some(raw) = get(key) else {
        return Ok(Duration::from_secs(default));
    };
    let invalid = |reason: String| ConfigError::Invalid {
        key,
        value: raw.clone(),
        reason,
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(invalid("must be greater than zero".into())),
        Ok(n) => Ok(Duration::from_secs(n)),
        Err(e) => Err(invalid(e.to_string())),
    }
}
