//! HTTP(S) connector.
//!
//! Reads a single file from a URL. Anonymous access is probed with a `HEAD`
//! request; the response status is classified by
//! [`classify_status`](crate::probe::classify_status).

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use crate::context::Context;
use crate::error::{ConnectorError, Result};
use crate::probe::{classify_status, transport_error};
use crate::spec::{PropertySchema, PropertyType, Spec};
use crate::traits::Connector;
use crate::validate::Properties;

pub const NAME: &str = "https";

static SPEC: Spec = Spec::new("http(s)", "Connect to a remote file.").properties(&[
    PropertySchema::new("path", PropertyType::String)
        .required()
        .display_name("Path")
        .description("Path to the remote file.")
        .placeholder("https://example.com/file.csv"),
]);

/// The `https` connector.
pub struct HttpsConnector;

#[async_trait]
impl Connector for HttpsConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn spec(&self) -> &'static Spec {
        &SPEC
    }

    async fn has_anonymous_access(&self, ctx: &Context, props: &Properties) -> Result<bool> {
        let validated = self.validate(props)?;
        let url = parse_url(validated.non_empty_str("path").unwrap_or_default())?;

        ctx.probe(NAME, async move {
            debug!(connector = NAME, host = url.host_str().unwrap_or(""), "probing url");
            let resp = reqwest::Client::new()
                .head(url)
                .send()
                .await
                .map_err(|e| transport_error(NAME, e))?;
            classify_status(NAME, resp.status())
        })
        .await
    }
}

/// Parse an `http` or `https` URL.
fn parse_url(path: &str) -> Result<Url> {
    let url = Url::parse(path)
        .map_err(|e| ConnectorError::invalid_property("path", format!("invalid URL: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConnectorError::invalid_property(
            "path",
            format!("unsupported scheme '{}', expected http or https", other),
        )),
    }
}
