//! Project configuration.
//!
//! A project file declares named sources, each bound to a connector and a
//! property mapping, plus settings for capability probes:
//!
//! ```toml
//! [probe]
//! timeout_secs = 10
//! allow_host_access = true
//!
//! [sources.trips]
//! connector = "s3"
//!
//! [sources.trips.properties]
//! path = "s3://nyc-tlc/trip data/*.parquet"
//! region = "us-east-1"
//! ```
//!
//! Loading checks only the file's own shape. Whether `connector` names a
//! registered connector, and whether the properties satisfy its Spec, is
//! decided later through the registry.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use crate::validate::Properties;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub sources: BTreeMap<String, SourceConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProbeConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Resolve connector variables from the process environment.
    #[serde(default = "default_allow_host_access")]
    pub allow_host_access: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            allow_host_access: default_allow_host_access(),
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    10
}
fn default_allow_host_access() -> bool {
    true
}

/// A named source: which connector to use and the properties to give it.
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub connector: String,
    #[serde(default)]
    pub properties: Properties,
}

impl Config {
    /// Look up a source by name.
    pub fn source(&self, name: &str) -> Result<&SourceConfig> {
        self.sources.get(name).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown source '{}'. Configured sources: {}",
                name,
                self.source_names()
            )
        })
    }

    fn source_names(&self) -> String {
        if self.sources.is_empty() {
            return "(none)".to_string();
        }
        self.sources
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Parse and check a configuration document.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    // Validate probe settings
    if config.probe.timeout_secs == 0 {
        anyhow::bail!("probe.timeout_secs must be > 0");
    }

    // Validate sources
    for (name, source) in &config.sources {
        if name.trim().is_empty() {
            anyhow::bail!("source names must not be empty");
        }
        if source.connector.trim().is_empty() {
            anyhow::bail!("sources.{}.connector must not be empty", name);
        }
    }

    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}
