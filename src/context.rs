//! Per-call context handed to capability queries.
//!
//! A [`Context`] carries everything a probe is allowed to depend on besides
//! the property mapping: the resolved [`Variables`], whether host
//! credentials may be used, a deadline, and a cancellation token. Connectors
//! read nothing else, except host credentials when
//! [`Context::allow_host_access`] permits it.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{ConnectorError, Result};
use crate::spec::Spec;

/// Default probe deadline.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime variables resolved by the caller (environment, secret store).
///
/// Keys are case-insensitive and stored lowercase. Values are never shown by
/// `Debug`, since any of them may be secret.
#[derive(Clone, Default)]
pub struct Variables {
    values: BTreeMap<String, String>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.values
            .insert(key.as_ref().to_ascii_lowercase(), value.into());
    }

    pub fn with(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Non-blank value for `key`, if any.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Collect the variables a Spec declares from a lookup function.
    ///
    /// Each key is looked up in upper case (`aws_access_key_id` →
    /// `AWS_ACCESS_KEY_ID`), matching environment-variable conventions.
    pub fn resolve<F>(spec: &Spec, mut lookup: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut vars = Self::new();
        for v in spec.variables {
            if let Some(value) = lookup(&v.key.to_ascii_uppercase()) {
                vars.insert(v.key, value);
            }
        }
        debug!(
            resolved = vars.len(),
            declared = spec.variables.len(),
            "resolved connector variables"
        );
        vars
    }

    /// Resolve a Spec's declared variables from the process environment.
    pub fn from_env(spec: &Spec) -> Self {
        Self::resolve(spec, |key| std::env::var(key).ok())
    }
}

impl fmt::Debug for Variables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = Self::new();
        for (k, v) in iter {
            vars.insert(k, v);
        }
        vars
    }
}

/// Inputs shared by every capability query of one call.
#[derive(Debug, Clone)]
pub struct Context {
    cancel: CancellationToken,
    timeout: Duration,
    variables: Variables,
    allow_host_access: bool,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
            timeout: DEFAULT_PROBE_TIMEOUT,
            variables: Variables::new(),
            allow_host_access: false,
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_host_access(mut self, allow: bool) -> Self {
        self.allow_host_access = allow;
        self
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    /// Whether a connector may fall back to credentials found on the host
    /// (environment variables) when the explicit variables hold none.
    pub fn allow_host_access(&self) -> bool {
        self.allow_host_access
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run a probe future under this context's deadline and cancellation.
    ///
    /// The future is dropped (aborting any in-flight request it owns) as soon
    /// as the token fires or the deadline passes.
    pub async fn probe<F, T>(&self, connector: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(ConnectorError::Cancelled {
                connector: connector.to_string(),
            });
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ConnectorError::Cancelled {
                connector: connector.to_string(),
            }),
            res = tokio::time::timeout(self.timeout, fut) => match res {
                Ok(inner) => inner,
                Err(_) => Err(ConnectorError::TimedOut {
                    connector: connector.to_string(),
                    timeout: self.timeout,
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::VariableSchema;

    #[test]
    fn variables_are_case_insensitive() {
        let vars = Variables::new().with("AWS_ACCESS_KEY_ID", "AKIA");
        assert_eq!(vars.get("aws_access_key_id"), Some("AKIA"));
        assert_eq!(vars.get("Aws_Access_Key_Id"), Some("AKIA"));
        assert_eq!(vars.keys().collect::<Vec<_>>(), vec!["aws_access_key_id"]);
    }

    #[test]
    fn debug_never_prints_values() {
        let vars = Variables::new().with("token", "hunter2");
        let rendered = format!("{:?}", vars);
        assert!(rendered.contains("token"));
        assert!(!rendered.contains("hunter2"));

        let ctx = Context::new().with_variables(vars);
        assert!(!format!("{:?}", ctx).contains("hunter2"));
    }

    #[test]
    fn blank_values_are_treated_as_absent() {
        let vars = Variables::new().with("token", "  ");
        assert_eq!(vars.get("token"), Some("  "));
        assert_eq!(vars.get_non_empty("token"), None);
    }

    #[test]
    fn resolve_uses_upper_case_keys() {
        static SPEC: Spec = Spec::new("T", "")
            .variables(&[VariableSchema::secret("api_token"), VariableSchema::new("region")]);
        let vars = Variables::resolve(&SPEC, |key| match key {
            "API_TOKEN" => Some("abc".to_string()),
            _ => None,
        });
        assert_eq!(vars.len(), 1);
        assert_eq!(vars.get("api_token"), Some("abc"));
    }

    #[tokio::test]
    async fn probe_returns_inner_result() {
        let ctx = Context::new();
        let v = ctx.probe("t", async { Ok(7) }).await.unwrap();
        assert_eq!(v, 7);
    }

    #[tokio::test]
    async fn probe_times_out() {
        let ctx = Context::new().with_timeout(Duration::from_millis(20));
        let err = ctx
            .probe("slow", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(true)
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::TimedOut { .. }));
        assert!(err.is_inconclusive());
    }

    #[tokio::test]
    async fn probe_observes_cancellation() {
        let token = CancellationToken::new();
        let ctx = Context::new().with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let err = ctx
            .probe("slow", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(true)
            })
            .await
            .unwrap_err();
        canceller.await.unwrap();
        assert!(matches!(err, ConnectorError::Cancelled { .. }));
    }

    #[tokio::test]
    async fn probe_short_circuits_when_already_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let ctx = Context::new().with_cancellation(token);
        let err = ctx.probe("t", async { Ok(()) }).await.unwrap_err();
        assert!(matches!(err, ConnectorError::Cancelled { .. }));
    }
}
