//! Error types for the connector registry and its validation and probes.
//!
//! Every error here is returned to the immediate caller. Nothing is retried
//! inside this crate and nothing is fatal to the process: a connector that
//! fails to register or validate leaves every other connector usable.

use std::time::Duration;

use thiserror::Error;

use crate::validate::ValidationErrors;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, ConnectorError>;

/// Errors raised by registration, lookup, validation, and capability queries.
#[derive(Debug, Error)]
pub enum ConnectorError {
    // Registration
    /// A connector was registered under an empty name.
    #[error("connector name must not be empty")]
    EmptyName,

    /// A connector with this name is already registered.
    #[error("connector '{name}' is already registered")]
    DuplicateConnector { name: String },

    /// The connector's Spec violates a structural invariant.
    #[error("connector '{name}' has an invalid spec: {reason}")]
    InvalidSpec { name: String, reason: String },

    // Lookup
    /// No connector is registered under this name.
    #[error("connector not found: {name}")]
    NotFound { name: String },

    // Validation
    /// The property mapping does not satisfy the connector's Spec.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// A property passed schema validation but its content is unusable
    /// (e.g. a malformed URI).
    #[error("invalid property '{key}': {message}")]
    InvalidProperty { key: String, message: String },

    // Capability queries
    /// A probe could not reach a verdict. This is never a definitive "no".
    #[error("access check for '{connector}' is indeterminate: {message}")]
    Indeterminate {
        connector: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A probe exceeded its deadline.
    #[error("access check for '{connector}' timed out after {timeout:?}")]
    TimedOut { connector: String, timeout: Duration },

    /// The caller abandoned the probe through the context's cancellation token.
    #[error("access check for '{connector}' was cancelled")]
    Cancelled { connector: String },

    /// The connector does not implement the requested capability.
    #[error("connector '{connector}' does not support {capability}")]
    Unsupported {
        connector: String,
        capability: &'static str,
    },
}

impl ConnectorError {
    /// Build an [`Indeterminate`](ConnectorError::Indeterminate) error from an
    /// underlying transport failure.
    pub fn indeterminate<E>(connector: &str, message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConnectorError::Indeterminate {
            connector: connector.to_string(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Build an [`InvalidProperty`](ConnectorError::InvalidProperty) error.
    pub fn invalid_property(key: &str, message: impl Into<String>) -> Self {
        ConnectorError::InvalidProperty {
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// Returns `true` if a capability query ended without a verdict.
    ///
    /// Callers must treat these as "unknown", never as "no access".
    pub fn is_inconclusive(&self) -> bool {
        matches!(
            self,
            ConnectorError::Indeterminate { .. }
                | ConnectorError::TimedOut { .. }
                | ConnectorError::Cancelled { .. }
        )
    }

    /// Returns `true` for registration failures.
    pub fn is_registration(&self) -> bool {
        matches!(
            self,
            ConnectorError::EmptyName
                | ConnectorError::DuplicateConnector { .. }
                | ConnectorError::InvalidSpec { .. }
        )
    }
}
