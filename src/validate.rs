//! Schema-driven validation of property mappings and variables.
//!
//! Validation is generic across connectors: it reads only the [`Spec`] and
//! the supplied values, never connector business logic.
//!
//! # Rules
//!
//! | Check | Error |
//! |-------|-------|
//! | required key absent | `missing required property: <key>` |
//! | value of the wrong kind | `type mismatch: <key> expected <type> got <kind>` |
//! | key not in the Spec | `unknown property: <key>` (warning when lenient) |
//! | variable key not in the Spec | `unknown variable: <key>` |
//! | declared variable with a blank value | `empty variable: <key>` |
//! | variable a capability cannot do without | `missing required variable: <key>` |
//!
//! Coercion is strict: strings only from JSON strings, numbers only from
//! JSON numbers, booleans only from JSON booleans. `null` is a mismatch.
//! Error messages name keys and kinds, never values, so secret material
//! cannot leak through diagnostics.

use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::context::Variables;
use crate::spec::{PropertyType, Spec};

/// Untyped property mapping as supplied by a caller.
pub type Properties = serde_json::Map<String, Value>;

/// Placeholder printed in place of secret values.
pub const REDACTED: &str = "***";

/// How keys that the Spec does not declare are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Unknown keys are errors.
    #[default]
    Strict,
    /// Unknown keys are reported as warnings on the result.
    Lenient,
}

/// A single validation problem. Always names the offending key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingRequired {
        key: String,
    },
    TypeMismatch {
        key: String,
        expected: PropertyType,
        got: &'static str,
    },
    UnknownProperty {
        key: String,
        /// `Some(secret)` if the key is declared as a variable instead.
        declared_variable: Option<bool>,
    },
    UnknownVariable {
        key: String,
    },
    MissingVariable {
        key: String,
    },
    EmptyVariable {
        key: String,
        secret: bool,
    },
}

impl ValidationError {
    pub fn key(&self) -> &str {
        match self {
            ValidationError::MissingRequired { key }
            | ValidationError::TypeMismatch { key, .. }
            | ValidationError::UnknownProperty { key, .. }
            | ValidationError::UnknownVariable { key }
            | ValidationError::MissingVariable { key }
            | ValidationError::EmptyVariable { key, .. } => key,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingRequired { key } => {
                write!(f, "missing required property: {}", key)
            }
            ValidationError::TypeMismatch { key, expected, got } => {
                write!(f, "type mismatch: {} expected {} got {}", key, expected, got)
            }
            ValidationError::UnknownProperty {
                key,
                declared_variable: None,
            } => write!(f, "unknown property: {}", key),
            ValidationError::UnknownProperty {
                key,
                declared_variable: Some(secret),
            } => write!(
                f,
                "unknown property: {} (declared as a {}variable; supply it through variables, not properties)",
                key,
                if *secret { "secret " } else { "" }
            ),
            ValidationError::UnknownVariable { key } => write!(f, "unknown variable: {}", key),
            ValidationError::MissingVariable { key } => {
                write!(f, "missing required variable: {}", key)
            }
            ValidationError::EmptyVariable { key, .. } => write!(f, "empty variable: {}", key),
        }
    }
}

/// Every problem found in one validation pass, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns `true` if any error names `key`.
    pub fn mentions(&self, key: &str) -> bool {
        self.errors.iter().any(|e| e.key() == key)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

/// A property value after coercion to its declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    Number(Number),
    Boolean(bool),
}

impl PropertyType {
    /// Coerce a supplied value to this type, or `None` on mismatch.
    ///
    /// Informational properties carry no typed value and also yield `None`;
    /// callers skip them before coercing.
    pub fn coerce(&self, value: &Value) -> Option<PropertyValue> {
        match (self, value) {
            (PropertyType::String, Value::String(s)) => Some(PropertyValue::String(s.clone())),
            (PropertyType::Number, Value::Number(n)) => Some(PropertyValue::Number(n.clone())),
            (PropertyType::Boolean, Value::Bool(b)) => Some(PropertyValue::Boolean(*b)),
            _ => None,
        }
    }
}

/// The kind name of an untyped value, as printed in mismatch errors.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A property mapping that satisfied its Spec, with typed accessors.
#[derive(Debug, Clone, Default)]
pub struct ValidatedProperties {
    values: BTreeMap<String, PropertyValue>,
    warnings: Vec<ValidationError>,
}

impl ValidatedProperties {
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.values.get(key)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(PropertyValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// String value with surrounding whitespace removed; blank counts as absent.
    pub fn non_empty_str(&self, key: &str) -> Option<&str> {
        self.str(key).map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.values.get(key) {
            Some(PropertyValue::Number(n)) => n.as_f64(),
            _ => None,
        }
    }

    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.values.get(key) {
            Some(PropertyValue::Number(n)) => n.as_i64(),
            _ => None,
        }
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(PropertyValue::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Unknown keys tolerated under [`Strictness::Lenient`].
    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }
}

impl Spec {
    /// Validate a property mapping under [`Strictness::Strict`].
    pub fn validate(&self, props: &Properties) -> Result<ValidatedProperties, ValidationErrors> {
        self.validate_with(props, Strictness::Strict)
    }

    /// Validate a property mapping, collecting every problem.
    pub fn validate_with(
        &self,
        props: &Properties,
        strictness: Strictness,
    ) -> Result<ValidatedProperties, ValidationErrors> {
        let mut errors = Vec::new();
        let mut validated = ValidatedProperties::default();

        for schema in self.properties {
            let Some(value) = props.get(schema.key) else {
                if schema.required {
                    errors.push(ValidationError::MissingRequired {
                        key: schema.key.to_string(),
                    });
                }
                continue;
            };

            if schema.property_type == PropertyType::Informational {
                continue;
            }

            match schema.property_type.coerce(value) {
                Some(typed) => {
                    validated.values.insert(schema.key.to_string(), typed);
                }
                None => errors.push(ValidationError::TypeMismatch {
                    key: schema.key.to_string(),
                    expected: schema.property_type,
                    got: value_kind(value),
                }),
            }
        }

        for key in props.keys() {
            if self.property(key).is_some() {
                continue;
            }
            let unknown = ValidationError::UnknownProperty {
                key: key.clone(),
                declared_variable: self.variable(key).map(|v| v.secret),
            };
            match strictness {
                Strictness::Strict => errors.push(unknown),
                Strictness::Lenient => validated.warnings.push(unknown),
            }
        }

        if errors.is_empty() {
            Ok(validated)
        } else {
            Err(ValidationErrors { errors })
        }
    }

    /// Validate caller-resolved variables against the declared variable list.
    ///
    /// Variables are optional (a missing credential may just mean anonymous
    /// access), but undeclared keys and blank values for declared keys are
    /// reported.
    pub fn validate_variables(&self, vars: &Variables) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        for schema in self.variables {
            if let Some(value) = vars.get(schema.key) {
                if value.trim().is_empty() {
                    errors.push(ValidationError::EmptyVariable {
                        key: schema.key.to_string(),
                        secret: schema.secret,
                    });
                }
            }
        }

        for key in vars.keys() {
            if self.variable(key).is_none() {
                errors.push(ValidationError::UnknownVariable {
                    key: key.to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { errors })
        }
    }

    /// Render supplied variables for diagnostics, masking secret values.
    ///
    /// Only declared variables are listed, in declaration order.
    pub fn redacted_variables(&self, vars: &Variables) -> Vec<(&'static str, String)> {
        self.variables
            .iter()
            .filter_map(|schema| {
                vars.get(schema.key).map(|value| {
                    let shown = if schema.secret {
                        REDACTED.to_string()
                    } else {
                        value.to_string()
                    };
                    (schema.key, shown)
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{PropertySchema, VariableSchema};
    use serde_json::json;

    static WAREHOUSE: Spec = Spec::new("Warehouse", "Run a warehouse query.")
        .properties(&[
            PropertySchema::new("query", PropertyType::String).required(),
            PropertySchema::new("limit", PropertyType::Number),
            PropertySchema::new("dry_run", PropertyType::Boolean),
            PropertySchema::new("credentials", PropertyType::Informational),
        ])
        .variables(&[VariableSchema::secret("token"), VariableSchema::new("project")]);

    fn props(v: Value) -> Properties {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn accepts_required_keys_only() {
        let validated = WAREHOUSE.validate(&props(json!({"query": "select 1"}))).unwrap();
        assert_eq!(validated.str("query"), Some("select 1"));
        assert_eq!(validated.len(), 1);
        assert!(validated.warnings().is_empty());
    }

    #[test]
    fn typed_accessors() {
        let validated = WAREHOUSE
            .validate(&props(json!({"query": "q", "limit": 10, "dry_run": true})))
            .unwrap();
        assert_eq!(validated.integer("limit"), Some(10));
        assert_eq!(validated.number("limit"), Some(10.0));
        assert_eq!(validated.bool("dry_run"), Some(true));
        assert_eq!(validated.str("limit"), None);
    }

    #[test]
    fn missing_required_names_key() {
        let err = WAREHOUSE.validate(&props(json!({}))).unwrap_err();
        assert_eq!(err.to_string(), "missing required property: query");
        assert!(err.mentions("query"));
    }

    #[test]
    fn type_mismatch_names_key_and_kinds() {
        let err = WAREHOUSE.validate(&props(json!({"query": 42}))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "type mismatch: query expected string got number"
        );

        let err = WAREHOUSE
            .validate(&props(json!({"query": "q", "limit": "10"})))
            .unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: limit expected number got string");

        let err = WAREHOUSE
            .validate(&props(json!({"query": null})))
            .unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: query expected string got null");
    }

    #[test]
    fn collects_every_problem() {
        let err = WAREHOUSE
            .validate(&props(json!({"limit": true, "qurey": "typo"})))
            .unwrap_err();
        assert_eq!(err.len(), 3);
        assert!(err.mentions("query"));
        assert!(err.mentions("limit"));
        assert!(err.mentions("qurey"));
    }

    #[test]
    fn unknown_property_strict_vs_lenient() {
        let input = props(json!({"query": "q", "extra": 1}));
        let err = WAREHOUSE.validate(&input).unwrap_err();
        assert_eq!(err.to_string(), "unknown property: extra");

        let validated = WAREHOUSE
            .validate_with(&input, Strictness::Lenient)
            .unwrap();
        assert_eq!(validated.warnings().len(), 1);
        assert_eq!(validated.warnings()[0].key(), "extra");
    }

    #[test]
    fn informational_values_are_not_type_checked() {
        let validated = WAREHOUSE
            .validate(&props(json!({"query": "q", "credentials": {"any": "thing"}})))
            .unwrap();
        assert!(!validated.contains("credentials"));
    }

    #[test]
    fn secret_in_properties_is_redirected_and_redacted() {
        let err = WAREHOUSE
            .validate(&props(json!({"query": "q", "token": "s3cr3t-value"})))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("token"));
        assert!(msg.contains("secret variable"));
        assert!(!msg.contains("s3cr3t-value"));
    }

    #[test]
    fn variables_validation() {
        let ok = Variables::new().with("TOKEN", "abc").with("project", "p1");
        assert!(WAREHOUSE.validate_variables(&ok).is_ok());
        assert!(WAREHOUSE.validate_variables(&Variables::new()).is_ok());

        let bad = Variables::new().with("token", " ").with("other", "x");
        let err = WAREHOUSE.validate_variables(&bad).unwrap_err();
        assert_eq!(err.to_string(), "empty variable: token; unknown variable: other");
    }

    #[test]
    fn redacted_variables_masks_secrets() {
        let vars = Variables::new().with("token", "abc").with("project", "p1");
        let shown = WAREHOUSE.redacted_variables(&vars);
        assert_eq!(
            shown,
            vec![("token", REDACTED.to_string()), ("project", "p1".to_string())]
        );
    }
}
