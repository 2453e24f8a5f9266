//! HTTP status classification shared by network-probing connectors.

use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::error::{ConnectorError, Result};

/// Map a probe response status to an access verdict.
///
/// | Status | Verdict |
/// |--------|---------|
/// | 2xx | `Ok(true)` |
/// | 400, 401, 403 | `Ok(false)` (S3-compatible stores answer auth failures with 400) |
/// | 404 | invalid `path` property |
/// | anything else | indeterminate |
pub fn classify_status(connector: &str, status: StatusCode) -> Result<bool> {
    debug!(connector, status = status.as_u16(), "probe response");
    match status {
        s if s.is_success() => Ok(true),
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(false),
        StatusCode::NOT_FOUND => Err(ConnectorError::invalid_property(
            "path",
            "resource does not exist (HTTP 404)",
        )),
        other => {
            warn!(connector, status = other.as_u16(), "probe returned no verdict");
            Err(ConnectorError::Indeterminate {
                connector: connector.to_string(),
                message: format!("unexpected HTTP {}", other),
                source: None,
            })
        }
    }
}

/// Wrap a transport failure as an indeterminate verdict.
pub fn transport_error(connector: &str, err: reqwest::Error) -> ConnectorError {
    warn!(connector, error = %err, "probe request failed");
    ConnectorError::indeterminate(connector, "request failed", err)
}
