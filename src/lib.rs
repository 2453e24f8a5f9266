//! # Connector Kit
//!
//! A registry and declarative self-description protocol for pluggable
//! data-source connectors.
//!
//! Each connector publishes a [`spec::Spec`] describing the properties a user
//! supplies and the variables (possibly secret) it needs at runtime. Generic
//! callers look connectors up by name, validate property mappings against
//! the Spec, and ask capability questions such as "can this source be read
//! without credentials?" through the [`traits::Connector`] trait, without
//! knowing anything about individual connectors.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  lookup   ┌─────────────────────┐
//! │ apply/ingest │──────────▶│  ConnectorRegistry  │
//! │   driver     │           │ s3 │ https │ local  │
//! └──────┬───────┘           └──────────┬──────────┘
//!        │ properties                   │ spec()
//!        ▼                              ▼
//! ┌──────────────┐           ┌─────────────────────┐
//! │  validation  │◀──────────│ Spec: properties +  │
//! │ (schema-only)│           │       variables     │
//! └──────┬───────┘           └─────────────────────┘
//!        ▼
//!  has_anonymous_access(ctx, props) → true / false / inconclusive
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! ckit connectors                 # list registered connectors
//! ckit describe s3                # show a connector's spec
//! ckit validate                   # validate every configured source
//! ckit check-access trips         # probe anonymous / credentialed access
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`spec`] | Spec, property and variable schemas |
//! | [`validate`] | Schema-driven validation and redaction |
//! | [`context`] | Per-call context: variables, deadline, cancellation |
//! | [`traits`] | The `Connector` capability trait |
//! | [`registry`] | Name-keyed connector registry |
//! | [`probe`] | HTTP status classification for network probes |
//! | [`connector_s3`] | Amazon S3 connector |
//! | [`connector_https`] | HTTP(S) connector |
//! | [`connector_local`] | Local file connector |
//! | [`config`] | TOML project configuration |
//! | [`error`] | Error taxonomy |

pub mod config;
pub mod connector_https;
pub mod connector_local;
pub mod connector_s3;
pub mod context;
pub mod error;
pub mod probe;
pub mod registry;
pub mod spec;
pub mod traits;
pub mod validate;
