//! Feature container schema model
//!
//! The descriptor subsystem owns the real schemas; this crate consumes an
//! introspection view of them. A feature container is a message-shaped
//! schema (the base) plus zero or more message-typed extensions of it.
//! Every feature field carries a `targets` annotation naming the
//! descriptor kinds it applies to and a list of per-edition textual
//! defaults.
//!
//! The shapes here are deliberately wider than what the resolver accepts:
//! oneofs, required/repeated cardinality, and nested extensions are all
//! representable so the validator can reject them by name.

use serde::{Deserialize, Serialize};

use crate::edition::Edition;

/// Descriptor kinds a feature field may apply to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureTarget {
    File,
    ExtensionRange,
    Message,
    Field,
    Oneof,
    Enum,
    EnumEntry,
    Service,
    Method,
}

/// Field cardinality as declared in the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    Singular,
    Required,
    Repeated,
}

impl Cardinality {
    pub fn is_required(&self) -> bool {
        matches!(self, Cardinality::Required)
    }

    pub fn is_repeated(&self) -> bool {
        matches!(self, Cardinality::Repeated)
    }
}

/// A single value of an enum schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValueSchema {
    pub name: String,
    pub number: i32,
}

/// An enum schema referenced by an enum-typed feature field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumSchema {
    pub name: String,
    pub full_name: String,
    pub values: Vec<EnumValueSchema>,
}

impl EnumSchema {
    /// Create an enum schema from `(name, number)` pairs
    pub fn new(full_name: impl Into<String>, values: &[(&str, i32)]) -> Self {
        let full_name = full_name.into();
        let name = last_segment(&full_name);
        Self {
            name,
            full_name,
            values: values
                .iter()
                .map(|(name, number)| EnumValueSchema {
                    name: (*name).to_string(),
                    number: *number,
                })
                .collect(),
        }
    }

    /// Look up a value by name
    pub fn value_by_name(&self, name: &str) -> Option<&EnumValueSchema> {
        self.values.iter().find(|v| v.name == name)
    }

    /// Look up a value by number
    pub fn value_by_number(&self, number: i32) -> Option<&EnumValueSchema> {
        self.values.iter().find(|v| v.number == number)
    }
}

/// The kind of a feature field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Bool,
    Int32,
    Int64,
    Uint32,
    Uint64,
    String,
    Enum(EnumSchema),
    Message(MessageSchema),
}

impl FieldKind {
    /// Get the enum schema if this is an enum-typed field
    pub fn enum_schema(&self) -> Option<&EnumSchema> {
        match self {
            FieldKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Get the message schema if this is a message-typed field
    pub fn message_schema(&self) -> Option<&MessageSchema> {
        match self {
            FieldKind::Message(m) => Some(m),
            _ => None,
        }
    }
}

/// A `(edition, textual value)` default on a feature field
///
/// The value applies from that edition onward until a later default
/// supersedes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditionDefault {
    pub edition: Edition,
    pub value: String,
}

/// A single feature field of a container schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    /// Fully-qualified name; filled in by [`MessageSchema::with_field`]
    /// when left empty
    pub full_name: String,
    pub number: u32,
    pub cardinality: Cardinality,
    pub kind: FieldKind,
    /// Descriptor kinds this feature applies to; must be non-empty
    #[serde(default)]
    pub targets: Vec<FeatureTarget>,
    /// Per-edition defaults, in declaration order
    #[serde(default)]
    pub edition_defaults: Vec<EditionDefault>,
}

impl FieldSchema {
    /// Create a singular field; targets and defaults attach via `with_*`
    pub fn new(name: impl Into<String>, number: u32, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            full_name: String::new(),
            number,
            cardinality: Cardinality::Singular,
            kind,
            targets: Vec::new(),
            edition_defaults: Vec::new(),
        }
    }

    /// Set the cardinality
    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Set the target annotation
    pub fn with_targets(mut self, targets: &[FeatureTarget]) -> Self {
        self.targets = targets.to_vec();
        self
    }

    /// Append an edition default
    pub fn with_edition_default(mut self, edition: impl Into<Edition>, value: &str) -> Self {
        self.edition_defaults.push(EditionDefault {
            edition: edition.into(),
            value: value.to_string(),
        });
        self
    }
}

/// A message-shaped schema: the base feature container or an extension
/// payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageSchema {
    pub name: String,
    pub full_name: String,
    pub fields: Vec<FieldSchema>,
    /// Names of oneof groupings declared in this message
    #[serde(default)]
    pub oneofs: Vec<String>,
    /// Field number ranges reserved for extensions
    #[serde(default)]
    pub extension_ranges: Vec<(u32, u32)>,
    /// Extensions declared inside this message's scope
    #[serde(default)]
    pub extensions: Vec<ExtensionField>,
}

impl MessageSchema {
    /// Create an empty message schema
    pub fn new(full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        let name = last_segment(&full_name);
        Self {
            name,
            full_name,
            fields: Vec::new(),
            oneofs: Vec::new(),
            extension_ranges: Vec::new(),
            extensions: Vec::new(),
        }
    }

    /// Append a field, qualifying its full name against this message
    pub fn with_field(mut self, mut field: FieldSchema) -> Self {
        if field.full_name.is_empty() {
            field.full_name = format!("{}.{}", self.full_name, field.name);
        }
        self.fields.push(field);
        self
    }

    /// Declare a oneof grouping
    pub fn with_oneof(mut self, name: impl Into<String>) -> Self {
        self.oneofs.push(name.into());
        self
    }

    /// Reserve a field number range for extensions
    pub fn with_extension_range(mut self, start: u32, end: u32) -> Self {
        self.extension_ranges.push((start, end));
        self
    }

    /// Declare an extension inside this message's scope
    pub fn with_extension(mut self, extension: ExtensionField) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Look up a field by name
    pub fn field_by_name(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// An extension field hanging off the base feature container
///
/// `extendee` names the message the extension extends; `payload` is the
/// extension's own message schema, absent when the extension is
/// scalar-typed (which the validator rejects).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionField {
    pub name: String,
    pub full_name: String,
    pub number: u32,
    pub cardinality: Cardinality,
    pub extendee: String,
    pub payload: Option<MessageSchema>,
}

impl ExtensionField {
    /// Create a singular message-typed extension
    pub fn new(
        full_name: impl Into<String>,
        number: u32,
        extendee: impl Into<String>,
        payload: MessageSchema,
    ) -> Self {
        let full_name = full_name.into();
        let name = last_segment(&full_name);
        Self {
            name,
            full_name,
            number,
            cardinality: Cardinality::Singular,
            extendee: extendee.into(),
            payload: Some(payload),
        }
    }

    /// Create a scalar-typed extension (rejected by validation; exists so
    /// the rejection path is representable)
    pub fn scalar(
        full_name: impl Into<String>,
        number: u32,
        extendee: impl Into<String>,
    ) -> Self {
        let full_name = full_name.into();
        let name = last_segment(&full_name);
        Self {
            name,
            full_name,
            number,
            cardinality: Cardinality::Singular,
            extendee: extendee.into(),
            payload: None,
        }
    }

    /// Set the cardinality
    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }
}

fn last_segment(full_name: &str) -> String {
    full_name
        .rsplit('.')
        .next()
        .unwrap_or(full_name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_full_names_qualify_against_container() {
        let schema = MessageSchema::new("features.FeatureSet")
            .with_field(FieldSchema::new("field_presence", 1, FieldKind::Bool));
        assert_eq!(schema.name, "FeatureSet");
        assert_eq!(
            schema.fields[0].full_name,
            "features.FeatureSet.field_presence"
        );
    }

    #[test]
    fn test_enum_schema_lookup() {
        let presence = EnumSchema::new(
            "features.FieldPresence",
            &[("FIELD_PRESENCE_UNKNOWN", 0), ("EXPLICIT", 1)],
        );
        assert_eq!(presence.name, "FieldPresence");
        assert_eq!(presence.value_by_name("EXPLICIT").unwrap().number, 1);
        assert_eq!(
            presence.value_by_number(0).unwrap().name,
            "FIELD_PRESENCE_UNKNOWN"
        );
        assert!(presence.value_by_name("MISSING").is_none());
    }

    #[test]
    fn test_builder_accumulates_defaults_in_order() {
        let field = FieldSchema::new("x", 1, FieldKind::String)
            .with_targets(&[FeatureTarget::Field])
            .with_edition_default("2024", "\"b\"")
            .with_edition_default("2022", "\"a\"");
        assert_eq!(field.edition_defaults.len(), 2);
        assert_eq!(field.edition_defaults[0].edition, Edition::from("2024"));
    }
}
