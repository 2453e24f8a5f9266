//! Name-keyed registry of connector capability objects.
//!
//! The registry is populated once, by an explicit initialization call, and
//! is read-only afterwards:
//!
//! ```rust
//! use std::sync::Arc;
//! use connector_kit::registry::ConnectorRegistry;
//!
//! let registry = Arc::new(ConnectorRegistry::with_builtins().unwrap());
//! let s3 = registry.lookup("s3").unwrap();
//! assert_eq!(s3.spec().display_name, "Amazon S3");
//! ```
//!
//! [`register`](ConnectorRegistry::register) takes `&mut self`, so once the
//! registry is shared behind an `Arc` no further registration can happen
//! and lookups need no lock.
//!
//! # Duplicate names
//!
//! Registering a name twice is rejected with
//! [`ConnectorError::DuplicateConnector`]; the first registration stays in
//! place. A rejected registration leaves the registry otherwise unchanged.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::connector_https::HttpsConnector;
use crate::connector_local::LocalFileConnector;
use crate::connector_s3::S3Connector;
use crate::error::{ConnectorError, Result};
use crate::spec::Spec;
use crate::traits::Connector;

/// Registry of connectors keyed by name.
#[derive(Default)]
pub struct ConnectorRegistry {
    entries: BTreeMap<String, Arc<dyn Connector>>,
}

impl ConnectorRegistry {
    /// Create an empty connector registry.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Create a registry holding every built-in connector, each under its
    /// [`Connector::name`].
    ///
    /// Registration order is fixed: `s3`, `https`, `local_file`.
    pub fn with_builtins() -> Result<Self> {
        let builtins: [Arc<dyn Connector>; 3] = [
            Arc::new(S3Connector),
            Arc::new(HttpsConnector),
            Arc::new(LocalFileConnector),
        ];
        let mut registry = Self::new();
        for connector in builtins {
            registry.register_arc(connector.name(), connector)?;
        }
        Ok(registry)
    }

    /// Register `connector` under `name`.
    ///
    /// Fails if `name` is blank, already taken, or the connector's Spec
    /// breaks a structural invariant (see [`Spec::check`]).
    pub fn register<C>(&mut self, name: &str, connector: C) -> Result<()>
    where
        C: Connector + 'static,
    {
        self.register_arc(name, Arc::new(connector))
    }

    /// Register an already shared connector.
    pub fn register_arc(&mut self, name: &str, connector: Arc<dyn Connector>) -> Result<()> {
        if name.trim().is_empty() {
            return Err(ConnectorError::EmptyName);
        }
        if self.entries.contains_key(name) {
            return Err(ConnectorError::DuplicateConnector {
                name: name.to_string(),
            });
        }
        connector
            .spec()
            .check()
            .map_err(|reason| ConnectorError::InvalidSpec {
                name: name.to_string(),
                reason,
            })?;

        debug!(connector = name, "registered connector");
        self.entries.insert(name.to_string(), connector);
        Ok(())
    }

    /// Look up the connector registered under `name`.
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn Connector>> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| ConnectorError::NotFound {
                name: name.to_string(),
            })
    }

    /// Iterate `(name, spec)` pairs sorted by name.
    ///
    /// Each call walks the current map again, so the sequence is restartable
    /// and has no side effects.
    pub fn list(&self) -> impl Iterator<Item = (&str, &'static Spec)> + '_ {
        self.entries
            .iter()
            .map(|(name, connector)| (name.as_str(), connector.spec()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the count of registered connectors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl std::fmt::Debug for ConnectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorRegistry")
            .field("connectors", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::spec::{PropertySchema, PropertyType, VariableSchema};
    use crate::validate::Properties;
    use async_trait::async_trait;

    static ALPHA: Spec = Spec::new("Alpha", "first");
    static BETA: Spec = Spec::new("Beta", "second");
    static BROKEN: Spec = Spec::new("Broken", "")
        .properties(&[PropertySchema::new("token", PropertyType::String)])
        .variables(&[VariableSchema::secret("token")]);

    struct Fixed(&'static Spec, bool);

    #[async_trait]
    impl Connector for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn spec(&self) -> &'static Spec {
            self.0
        }

        async fn has_anonymous_access(&self, _ctx: &Context, _props: &Properties) -> Result<bool> {
            Ok(self.1)
        }
    }

    #[test]
    fn lookup_returns_registered_connector() {
        let mut reg = ConnectorRegistry::new();
        reg.register("alpha", Fixed(&ALPHA, true)).unwrap();
        assert_eq!(reg.lookup("alpha").unwrap().spec().display_name, "Alpha");
        assert!(reg.contains("alpha"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn lookup_unknown_fails() {
        let reg = ConnectorRegistry::new();
        let err = reg.lookup("ghost").err().unwrap();
        assert!(matches!(err, ConnectorError::NotFound { ref name } if name == "ghost"));
    }

    #[test]
    fn empty_name_rejected() {
        let mut reg = ConnectorRegistry::new();
        let err = reg.register("  ", Fixed(&ALPHA, true)).unwrap_err();
        assert!(matches!(err, ConnectorError::EmptyName));
        assert!(reg.is_empty());
    }

    #[test]
    fn duplicate_rejected_and_first_kept() {
        let mut reg = ConnectorRegistry::new();
        reg.register("dup", Fixed(&ALPHA, true)).unwrap();
        for _ in 0..3 {
            let err = reg.register("dup", Fixed(&BETA, false)).unwrap_err();
            assert!(matches!(err, ConnectorError::DuplicateConnector { .. }));
        }
        assert_eq!(reg.lookup("dup").unwrap().spec().display_name, "Alpha");
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn invalid_spec_rejected_without_blocking_others() {
        let mut reg = ConnectorRegistry::new();
        let err = reg.register("broken", Fixed(&BROKEN, true)).unwrap_err();
        assert!(err.is_registration());
        reg.register("alpha", Fixed(&ALPHA, true)).unwrap();
        assert_eq!(reg.names().collect::<Vec<_>>(), vec!["alpha"]);
    }

    #[test]
    fn list_is_sorted_and_restartable() {
        let mut reg = ConnectorRegistry::new();
        reg.register("beta", Fixed(&BETA, true)).unwrap();
        reg.register("alpha", Fixed(&ALPHA, true)).unwrap();

        let first: Vec<_> = reg.list().map(|(n, s)| (n, s.display_name)).collect();
        let second: Vec<_> = reg.list().map(|(n, s)| (n, s.display_name)).collect();
        assert_eq!(first, vec![("alpha", "Alpha"), ("beta", "Beta")]);
        assert_eq!(first, second);
    }

    #[test]
    fn builtins_register_in_order() {
        let reg = ConnectorRegistry::with_builtins().unwrap();
        assert_eq!(
            reg.names().collect::<Vec<_>>(),
            vec!["https", "local_file", "s3"]
        );
        for name in reg.names() {
            assert_eq!(reg.lookup(name).unwrap().name(), name);
        }
        let dbg = format!("{:?}", reg);
        assert!(dbg.contains("s3"));
    }
}
