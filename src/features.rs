//! Dynamic feature container instances
//!
//! Feature container schemas are only known at run time, so populated
//! instances are value trees rather than generated structs: an ordered map
//! from field name to [`FeatureValue`]. Extension payloads appear as
//! nested message entries keyed by the extension field's full name.
//!
//! Merge follows the interchange format's standard semantics: scalar
//! fields overwrite when present, sub-messages recurse. Feature containers
//! forbid repeated fields, which eliminates the append case.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;

/// A single populated feature value
///
/// Enum values carry both the value name and number; the number is what
/// merged-set validation checks against the zero sentinel, without
/// re-consulting the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FeatureValue {
    Bool(bool),
    Int(i64),
    Uint(u64),
    String(String),
    Enum { name: String, number: i32 },
    Message(FeatureSet),
}

impl FeatureValue {
    /// Create an enum value
    pub fn enumeration(name: impl Into<String>, number: i32) -> Self {
        FeatureValue::Enum {
            name: name.into(),
            number,
        }
    }
}

/// A populated feature container instance
///
/// The map is ordered so serialization is deterministic: compiling the
/// same inputs twice yields byte-identical artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet {
    fields: BTreeMap<String, FeatureValue>,
}

impl FeatureSet {
    /// Create an empty feature set
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no fields are populated
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether a field is populated
    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Get a populated field value
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.fields.get(name)
    }

    /// Set a field value, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: FeatureValue) {
        self.fields.insert(name.into(), value);
    }

    /// Clear a field
    pub fn clear(&mut self, name: &str) {
        self.fields.remove(name);
    }

    /// Iterate populated fields in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Get a populated sub-message, if the field holds one
    pub fn sub_message(&self, name: &str) -> Option<&FeatureSet> {
        match self.fields.get(name) {
            Some(FeatureValue::Message(m)) => Some(m),
            _ => None,
        }
    }

    /// Get the sub-message under `name`, creating it (and displacing any
    /// non-message value) if needed
    pub fn sub_message_mut(&mut self, name: &str) -> &mut FeatureSet {
        if !matches!(self.fields.get(name), Some(FeatureValue::Message(_))) {
            self.fields
                .insert(name.to_string(), FeatureValue::Message(FeatureSet::new()));
        }
        match self.fields.get_mut(name) {
            Some(FeatureValue::Message(m)) => m,
            _ => unreachable!("sub-message was just inserted"),
        }
    }

    /// Merge `other` into `self`: scalars overwrite, messages recurse
    pub fn merge_from(&mut self, other: &FeatureSet) {
        for (name, value) in &other.fields {
            let merged = match (self.fields.remove(name), value) {
                (Some(FeatureValue::Message(mut dst)), FeatureValue::Message(src)) => {
                    dst.merge_from(src);
                    FeatureValue::Message(dst)
                }
                (_, incoming) => incoming.clone(),
            };
            self.fields.insert(name.clone(), merged);
        }
    }

    /// Serialize to interchange-format bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Deserialize from interchange-format bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
