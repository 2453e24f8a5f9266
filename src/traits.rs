//! The connector capability contract.
//!
//! Every connector implements [`Connector`]. Generic orchestration code
//! (an apply or ingest driver) only ever talks to connectors through this
//! trait, so adding a connector never touches dispatch logic elsewhere.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │           ConnectorRegistry              │
//! │  ┌─────────┐ ┌─────────┐ ┌────────────┐ │
//! │  │   s3    │ │  https  │ │ local_file │ │
//! │  └─────────┘ └─────────┘ └────────────┘ │
//! └──────────────┬───────────────────────────┘
//!                ▼
//!   lookup(name) → spec() → validate → has_anonymous_access()
//! ```
//!
//! Connectors are stateless. Anything a particular source needs arrives
//! per call in the property mapping and the [`Context`], so one registered
//! instance serves all callers.

use async_trait::async_trait;

use crate::context::Context;
use crate::error::{ConnectorError, Result};
use crate::spec::Spec;
use crate::validate::{Properties, ValidatedProperties};

/// A pluggable data-source connector.
///
/// # Capability queries
///
/// Capability queries are pure with respect to `(ctx, props)`: no hidden
/// global state may influence the verdict. The host environment counts as
/// input only when [`Context::allow_host_access`] is set. Queries that touch the network
/// return [`ConnectorError::Indeterminate`], [`ConnectorError::TimedOut`], or
/// [`ConnectorError::Cancelled`] when they cannot decide. Those are never a
/// "no"; see [`ConnectorError::is_inconclusive`].
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use connector_kit::context::Context;
/// use connector_kit::error::Result;
/// use connector_kit::spec::{PropertySchema, PropertyType, Spec, VariableSchema};
/// use connector_kit::traits::Connector;
/// use connector_kit::validate::Properties;
///
/// static SPEC: Spec = Spec::new("Warehouse", "Import rows from a warehouse query.")
///     .properties(&[PropertySchema::new("query", PropertyType::String).required()])
///     .variables(&[VariableSchema::secret("token")]);
///
/// pub struct WarehouseConnector;
///
/// #[async_trait]
/// impl Connector for WarehouseConnector {
///     fn name(&self) -> &'static str {
///         "warehouse"
///     }
///
///     fn spec(&self) -> &'static Spec {
///         &SPEC
///     }
///
///     async fn has_anonymous_access(&self, _ctx: &Context, props: &Properties) -> Result<bool> {
///         self.spec().validate(props)?;
///         Ok(false)
///     }
/// }
/// ```
#[async_trait]
pub trait Connector: Send + Sync {
    /// Canonical connector name, used to identify it in errors and logs.
    /// Built-in connectors are registered under this name.
    fn name(&self) -> &'static str;

    /// This connector type's Spec. Always returns the same value.
    fn spec(&self) -> &'static Spec;

    /// Whether extraction can proceed without additional credentials.
    ///
    /// `props` may be partially populated; a connector that cannot answer
    /// without a particular property returns a validation error for it.
    async fn has_anonymous_access(&self, ctx: &Context, props: &Properties) -> Result<bool>;

    /// Whether the credentials in `ctx.variables()` grant access.
    ///
    /// Connectors that cannot check credentials keep the default, which
    /// reports [`ConnectorError::Unsupported`].
    async fn verify_credentials(&self, _ctx: &Context, _props: &Properties) -> Result<bool> {
        Err(ConnectorError::Unsupported {
            connector: self.name().to_string(),
            capability: "credential verification",
        })
    }

    /// Validate `props` against [`spec`](Connector::spec).
    fn validate(&self, props: &Properties) -> Result<ValidatedProperties> {
        Ok(self.spec().validate(props)?)
    }
}
