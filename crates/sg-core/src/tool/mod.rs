//! Tool catalog — the external collaborators scangate knows how to run.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ToolKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Source quality scanner (sonar-scanner), backed by the remote analysis server.
    StaticAnalysis,
    /// Image / filesystem vulnerability scanner (trivy).
    VulnerabilityScanner,
}

impl ToolKind {
    /// Key used for this collaborator in the health report.
    pub fn service_name(&self) -> &'static str {
        match self {
            ToolKind::StaticAnalysis => "sonarqube",
            ToolKind::VulnerabilityScanner => "trivy",
        }
    }

    /// Executable looked up on `PATH` when nothing else is configured.
    pub fn default_program(&self) -> &'static str {
        match self {
            ToolKind::StaticAnalysis => "sonar-scanner",
            ToolKind::VulnerabilityScanner => "trivy",
        }
    }
}

// ---------------------------------------------------------------------------
// ToolCommand
// ---------------------------------------------------------------------------

/// A configured command prefix; per-request arguments are appended to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: vec![],
        }
    }

    pub fn for_kind(kind: ToolKind) -> Self {
        Self::new(kind.default_program())
    }

    /// Full argv: program, prefix args, then `extra`.
    pub fn argv_with<I, S>(&self, extra: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .chain(extra.into_iter().map(Into::into))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
