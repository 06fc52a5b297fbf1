//! Schema declarations for data sources
//!
//! A schema lists the attributes a data source exposes and whether the user
//! may set them. The IP address data source only has computed attributes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Value type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    /// A single string
    String,
    /// An ordered list of strings
    ListOfString,
}

impl AttributeKind {
    fn matches(&self, value: &Value) -> bool {
        match self {
            AttributeKind::String => value.is_string(),
            AttributeKind::ListOfString => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }
}

/// A single attribute declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name
    pub name: String,
    /// Value type
    pub kind: AttributeKind,
    /// Set by the data source, not the user
    pub computed: bool,
    /// May be set by the user
    pub optional: bool,
    /// Must be set by the user
    pub required: bool,
    /// Human-readable description
    pub description: String,
}

impl Attribute {
    /// Declare a computed attribute
    pub fn computed(name: impl Into<String>, kind: AttributeKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            computed: true,
            optional: false,
            required: false,
            description: description.into(),
        }
    }
}

/// Attribute set of a data source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    attributes: Vec<Attribute>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// All declared attributes, in declaration order
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Check that `values` carries every declared attribute with the right type
    pub fn validate_record(&self, values: &Map<String, Value>) -> Result<()> {
        for attribute in &self.attributes {
            let value = values.get(&attribute.name).ok_or_else(|| {
                Error::invalid_record(format!("missing attribute '{}'", attribute.name))
            })?;

            if !attribute.kind.matches(value) {
                return Err(Error::invalid_record(format!(
                    "attribute '{}' is not a {:?}: {}",
                    attribute.name, attribute.kind, value
                )));
            }
        }

        Ok(())
    }
}
