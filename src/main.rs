//! # Connector Kit CLI (`ckit`)
//!
//! Inspect the connector registry and check configured sources against it.
//!
//! ## Usage
//!
//! ```bash
//! ckit --config ./ckit.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ckit connectors` | List registered connectors |
//! | `ckit describe <connector>` | Print a connector's spec |
//! | `ckit validate [source]` | Validate one or all configured sources |
//! | `ckit check-access <source>` | Probe whether a source is readable, anonymously or with credentials |
//!
//! Set `RUST_LOG=connector_kit=debug` to see registration and probe details.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use connector_kit::config::{load_config, Config};
use connector_kit::context::{Context, Variables};
use connector_kit::error::ConnectorError;
use connector_kit::registry::ConnectorRegistry;
use connector_kit::spec::Spec;

/// Connector Kit CLI: inspect connectors and validate source definitions.
#[derive(Parser)]
#[command(
    name = "ckit",
    about = "Connector Kit: inspect connectors and validate source definitions",
    version
)]
struct Cli {
    /// Path to the project configuration file (TOML).
    #[arg(long, global = true, default_value = "./ckit.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// List registered connectors.
    Connectors {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Show a connector's properties and variables.
    Describe {
        /// Connector name (e.g. `s3`).
        connector: String,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Validate configured sources against their connector specs.
    ///
    /// Every source is checked even if an earlier one fails.
    Validate {
        /// Only validate this source.
        source: Option<String>,
    },

    /// Check whether a source can be read anonymously, or else with the
    /// credentials found in the environment.
    CheckAccess {
        /// Source name from the config file.
        source: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "connector_kit=info,ckit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let registry = ConnectorRegistry::with_builtins()?;

    match cli.command {
        Commands::Connectors { json } => cmd_connectors(&registry, json),
        Commands::Describe { connector, json } => cmd_describe(&registry, &connector, json),
        Commands::Validate { source } => {
            let config = load_config(&cli.config)?;
            cmd_validate(&registry, &config, source.as_deref())
        }
        Commands::CheckAccess { source } => {
            let config = load_config(&cli.config)?;
            cmd_check_access(&registry, &config, &source).await
        }
    }
}

fn cmd_connectors(registry: &ConnectorRegistry, json: bool) -> Result<()> {
    if json {
        let list: Vec<_> = registry
            .list()
            .map(|(name, spec)| serde_json::json!({ "name": name, "spec": spec }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    println!("{:<12} {:<20} DESCRIPTION", "CONNECTOR", "DISPLAY NAME");
    for (name, spec) in registry.list() {
        println!("{:<12} {:<20} {}", name, spec.display_name, spec.description);
    }
    Ok(())
}

fn cmd_describe(registry: &ConnectorRegistry, name: &str, json: bool) -> Result<()> {
    let spec = registry.lookup(name)?.spec();
    if json {
        println!("{}", serde_json::to_string_pretty(spec)?);
        return Ok(());
    }
    print_spec(name, spec);
    Ok(())
}

fn print_spec(name: &str, spec: &Spec) {
    println!("{} ({})", spec.display_name, name);
    println!("  {}", spec.description);
    if let Some(docs) = spec.service_account_docs {
        println!("  docs: {}", docs);
    }

    println!();
    println!("  {:<18} {:<14} {:<9} DESCRIPTION", "PROPERTY", "TYPE", "REQUIRED");
    for p in spec.properties {
        println!(
            "  {:<18} {:<14} {:<9} {}",
            p.key,
            p.property_type,
            if p.required { "yes" } else { "no" },
            p.description
        );
        if let Some(placeholder) = p.placeholder {
            println!("  {:<18} {:<14} {:<9}   e.g. {}", "", "", "", placeholder);
        }
    }

    if !spec.variables.is_empty() {
        println!();
        println!("  {:<24} SECRET", "VARIABLE");
        for v in spec.variables {
            println!("  {:<24} {}", v.key, if v.secret { "yes" } else { "no" });
        }
    }
}

fn cmd_validate(registry: &ConnectorRegistry, config: &Config, only: Option<&str>) -> Result<()> {
    let names: Vec<&str> = match only {
        Some(name) => {
            config.source(name)?;
            vec![name]
        }
        None => config.sources.keys().map(String::as_str).collect(),
    };

    if names.is_empty() {
        println!("No sources configured.");
        return Ok(());
    }

    let mut failed = 0;
    println!("{:<16} {:<12} STATUS", "SOURCE", "CONNECTOR");
    for name in &names {
        let source = config.source(name)?;
        let outcome = registry.lookup(&source.connector).and_then(|connector| {
            let validated = connector.validate(&source.properties)?;
            if config.probe.allow_host_access {
                let vars = Variables::from_env(connector.spec());
                connector.spec().validate_variables(&vars)?;
            }
            Ok(validated)
        });

        match outcome {
            Ok(validated) => {
                println!("{:<16} {:<12} OK", name, source.connector);
                for w in validated.warnings() {
                    println!("{:<16} {:<12}   warning: {}", "", "", w);
                }
            }
            Err(e) => {
                failed += 1;
                println!("{:<16} {:<12} FAILED: {}", name, source.connector, e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} sources failed validation", failed, names.len());
    }
    Ok(())
}

async fn cmd_check_access(registry: &ConnectorRegistry, config: &Config, name: &str) -> Result<()> {
    let source = config.source(name)?;
    let connector = registry.lookup(&source.connector)?;
    let spec = connector.spec();
    connector.validate(&source.properties)?;

    // Host variables are read by the connector itself; these are only logged.
    if config.probe.allow_host_access {
        for (key, shown) in spec.redacted_variables(&Variables::from_env(spec)) {
            info!(variable = key, value = %shown, "host variable available");
        }
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let ctx = Context::new()
        .with_cancellation(cancel)
        .with_timeout(config.probe.timeout())
        .with_host_access(config.probe.allow_host_access);

    match connector.has_anonymous_access(&ctx, &source.properties).await {
        Ok(true) => {
            println!("{}: readable without credentials", name);
            return Ok(());
        }
        Ok(false) => println!("{}: credentials required", name),
        Err(e) if e.is_inconclusive() => {
            warn!(source = name, error = %e, "anonymous access check was inconclusive");
            println!("{}: anonymous access unknown ({})", name, e);
        }
        Err(e) => return Err(e.into()),
    }

    match connector.verify_credentials(&ctx, &source.properties).await {
        Ok(true) => {
            println!("{}: readable with supplied credentials", name);
            Ok(())
        }
        Ok(false) => anyhow::bail!("{}: supplied credentials were rejected", name),
        Err(ConnectorError::Validation(errors)) => {
            let keys: Vec<String> = spec
                .variables
                .iter()
                .map(|v| v.key.to_ascii_uppercase())
                .collect();
            if !config.probe.allow_host_access {
                anyhow::bail!(
                    "{}: {}; host access is disabled (probe.allow_host_access = false)",
                    name,
                    errors
                );
            }
            anyhow::bail!("{}: {}; set one or more of: {}", name, errors, keys.join(", "))
        }
        Err(ConnectorError::Unsupported { .. }) => {
            anyhow::bail!(
                "{}: cannot be read anonymously and {} cannot check credentials",
                name,
                source.connector
            )
        }
        Err(e) if e.is_inconclusive() => {
            anyhow::bail!("{}: credential check inconclusive: {}", name, e)
        }
        Err(e) => Err(e.into()),
    }
}
