//! Health check response body.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy` when every check passed, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: CheckStatus,
    pub media: CheckStatus,
}

/// Outcome of one dependency check.
#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    pub fn ok(message: &str) -> Self {
        Self {
            status: "ok",
            message: Some(message.to_string()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            status: "error",
            message: Some(message),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

impl HealthChecks {
    pub fn all_ok(&self) -> bool {
        self.database.is_ok() && self.media.is_ok()
    }
}
