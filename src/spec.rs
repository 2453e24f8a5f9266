//! Declarative connector self-descriptions.
//!
//! A [`Spec`] is the self-description a connector publishes: display
//! metadata, the ordered list of user-supplied [`PropertySchema`]s, and the
//! ordered list of runtime [`VariableSchema`]s (possibly secret).
//!
//! Specs are built once as `static` constants when a connector type is
//! defined and are never mutated afterwards:
//!
//! ```rust
//! use connector_kit::spec::{PropertySchema, PropertyType, Spec, VariableSchema};
//!
//! static WAREHOUSE: Spec = Spec::new("Warehouse", "Import rows from a warehouse query.")
//!     .properties(&[PropertySchema::new("query", PropertyType::String)
//!         .required()
//!         .display_name("Query")
//!         .placeholder("select * from events")])
//!     .variables(&[VariableSchema::secret("token")]);
//!
//! assert!(WAREHOUSE.check().is_ok());
//! assert!(WAREHOUSE.variable("token").unwrap().secret);
//! ```

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// The closed set of value kinds a property can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    /// Display-only entry (e.g. a note on where credentials come from).
    /// Never required; supplied values are not type-checked.
    Informational,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Number => "number",
            PropertyType::Boolean => "boolean",
            PropertyType::Informational => "informational",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One user-supplied configuration field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertySchema {
    pub key: &'static str,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub required: bool,
    pub display_name: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<&'static str>,
}

impl PropertySchema {
    /// An optional property with the key doubling as its display name.
    pub const fn new(key: &'static str, property_type: PropertyType) -> Self {
        Self {
            key,
            property_type,
            required: false,
            display_name: key,
            description: "",
            placeholder: None,
            hint: None,
            href: None,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn display_name(mut self, display_name: &'static str) -> Self {
        self.display_name = display_name;
        self
    }

    pub const fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub const fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub const fn hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }

    pub const fn href(mut self, href: &'static str) -> Self {
        self.href = Some(href);
        self
    }
}

/// One runtime input resolved outside the property mapping.
///
/// Values of `secret` variables must never be logged, persisted in plain
/// text, or echoed back in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableSchema {
    pub key: &'static str,
    pub secret: bool,
}

impl VariableSchema {
    pub const fn new(key: &'static str) -> Self {
        Self { key, secret: false }
    }

    pub const fn secret(key: &'static str) -> Self {
        Self { key, secret: true }
    }
}

/// A connector's declarative contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Spec {
    pub display_name: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_account_docs: Option<&'static str>,
    /// Rendering order is the declaration order.
    pub properties: &'static [PropertySchema],
    pub variables: &'static [VariableSchema],
}

impl Spec {
    pub const fn new(display_name: &'static str, description: &'static str) -> Self {
        Self {
            display_name,
            description,
            service_account_docs: None,
            properties: &[],
            variables: &[],
        }
    }

    pub const fn service_account_docs(mut self, url: &'static str) -> Self {
        self.service_account_docs = Some(url);
        self
    }

    pub const fn properties(mut self, properties: &'static [PropertySchema]) -> Self {
        self.properties = properties;
        self
    }

    pub const fn variables(mut self, variables: &'static [VariableSchema]) -> Self {
        self.variables = variables;
        self
    }

    /// Find a property schema by key.
    pub fn property(&self, key: &str) -> Option<&PropertySchema> {
        self.properties.iter().find(|p| p.key == key)
    }

    /// Find a variable schema by key (case-insensitive, like [`Variables`](crate::context::Variables)).
    pub fn variable(&self, key: &str) -> Option<&VariableSchema> {
        self.variables
            .iter()
            .find(|v| v.key.eq_ignore_ascii_case(key))
    }

    pub fn required_properties(&self) -> impl Iterator<Item = &PropertySchema> {
        self.properties.iter().filter(|p| p.required)
    }

    /// Returns `true` if `key` names a secret variable.
    pub fn is_secret(&self, key: &str) -> bool {
        self.variable(key).map(|v| v.secret).unwrap_or(false)
    }

    /// Verify the structural invariants every Spec must hold.
    ///
    /// - keys are non-empty
    /// - property keys are unique, variable keys are unique (case-insensitive)
    /// - no key is both a property and a variable
    /// - informational properties are never required
    pub fn check(&self) -> std::result::Result<(), String> {
        let mut property_keys = HashSet::new();
        for p in self.properties {
            if p.key.trim().is_empty() {
                return Err("property key must not be empty".to_string());
            }
            if !property_keys.insert(p.key) {
                return Err(format!("duplicate property key '{}'", p.key));
            }
            if p.required && p.property_type == PropertyType::Informational {
                return Err(format!(
                    "informational property '{}' cannot be required",
                    p.key
                ));
            }
        }

        let mut variable_keys = HashSet::new();
        for v in self.variables {
            if v.key.trim().is_empty() {
                return Err("variable key must not be empty".to_string());
            }
            let normalized = v.key.to_ascii_lowercase();
            if property_keys
                .iter()
                .any(|p| p.eq_ignore_ascii_case(&normalized))
            {
                return Err(format!(
                    "key '{}' is declared as both a property and a variable",
                    v.key
                ));
            }
            if !variable_keys.insert(normalized) {
                return Err(format!("duplicate variable key '{}'", v.key));
            }
        }

        Ok(())
    }
}
