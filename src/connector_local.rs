//! Local file connector.
//!
//! Files on the local disk never need credentials, so anonymous access is
//! always granted once the properties validate. No filesystem access
//! happens here; whether the path exists is an extraction-time concern.

use async_trait::async_trait;

use crate::context::Context;
use crate::error::{ConnectorError, Result};
use crate::spec::{PropertySchema, PropertyType, Spec};
use crate::traits::Connector;
use crate::validate::Properties;

static SPEC: Spec = Spec::new("Local file", "Import a locally stored file.").properties(&[
    PropertySchema::new("path", PropertyType::String)
        .required()
        .display_name("Path")
        .description("Path or URL to file")
        .placeholder("/path/to/file"),
    PropertySchema::new("format", PropertyType::String)
        .display_name("Format")
        .description("Either CSV or Parquet. Inferred if not set.")
        .placeholder("csv"),
]);

pub const NAME: &str = "local_file";

/// The `local_file` connector.
pub struct LocalFileConnector;

#[async_trait]
impl Connector for LocalFileConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn spec(&self) -> &'static Spec {
        &SPEC
    }

    async fn has_anonymous_access(&self, _ctx: &Context, props: &Properties) -> Result<bool> {
        let validated = self.validate(props)?;
        if validated.non_empty_str("path").is_none() {
            return Err(ConnectorError::invalid_property("path", "must not be empty"));
        }
        Ok(true)
    }
}
