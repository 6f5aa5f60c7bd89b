//! Built-in standard feature container
//!
//! The schema language ships a set of standard behavior switches that
//! every descriptor resolves, independent of any language- or
//! tool-specific extension: field presence tracking, enum openness,
//! repeated-field encoding, UTF-8 validation policy, message wire
//! encoding, and JSON mapping. Each switch is enum-typed with a reserved
//! zero "unknown" value, so a merged set that ever resolves to zero is
//! caught by validation.
//!
//! This module constructs that container as a [`MessageSchema`], which is
//! also the shape tool authors mirror when defining their own extension
//! payloads.

use crate::defaults::{compile_defaults, FeatureSetDefaults};
use crate::edition::Edition;
use crate::error::Result;
use crate::schema::{EnumSchema, FeatureTarget, FieldKind, FieldSchema, MessageSchema};

/// Earliest edition the standard container has defaults for
pub const MINIMUM_SUPPORTED_EDITION: &str = "2023";

/// Latest edition the standard container supports
pub const MAXIMUM_SUPPORTED_EDITION: &str = "2024";

/// Full name of the standard feature container
pub const FEATURE_SET_FULL_NAME: &str = "features.FeatureSet";

/// The standard feature container schema
pub fn standard_features() -> MessageSchema {
    let field_presence = EnumSchema::new(
        "features.FieldPresence",
        &[
            ("FIELD_PRESENCE_UNKNOWN", 0),
            ("EXPLICIT", 1),
            ("IMPLICIT", 2),
            ("LEGACY_REQUIRED", 3),
        ],
    );
    let enum_type = EnumSchema::new(
        "features.EnumType",
        &[("ENUM_TYPE_UNKNOWN", 0), ("OPEN", 1), ("CLOSED", 2)],
    );
    let repeated_field_encoding = EnumSchema::new(
        "features.RepeatedFieldEncoding",
        &[
            ("REPEATED_FIELD_ENCODING_UNKNOWN", 0),
            ("PACKED", 1),
            ("EXPANDED", 2),
        ],
    );
    let utf8_validation = EnumSchema::new(
        "features.Utf8Validation",
        &[("UTF8_VALIDATION_UNKNOWN", 0), ("VERIFY", 2), ("NONE", 3)],
    );
    let message_encoding = EnumSchema::new(
        "features.MessageEncoding",
        &[
            ("MESSAGE_ENCODING_UNKNOWN", 0),
            ("LENGTH_PREFIXED", 1),
            ("DELIMITED", 2),
        ],
    );
    let json_format = EnumSchema::new(
        "features.JsonFormat",
        &[
            ("JSON_FORMAT_UNKNOWN", 0),
            ("ALLOW", 1),
            ("LEGACY_BEST_EFFORT", 2),
        ],
    );

    MessageSchema::new(FEATURE_SET_FULL_NAME)
        .with_field(
            FieldSchema::new("field_presence", 1, FieldKind::Enum(field_presence))
                .with_targets(&[FeatureTarget::Field, FeatureTarget::File])
                .with_edition_default(MINIMUM_SUPPORTED_EDITION, "EXPLICIT"),
        )
        .with_field(
            FieldSchema::new("enum_type", 2, FieldKind::Enum(enum_type))
                .with_targets(&[FeatureTarget::Enum, FeatureTarget::File])
                .with_edition_default(MINIMUM_SUPPORTED_EDITION, "OPEN"),
        )
        .with_field(
            FieldSchema::new(
                "repeated_field_encoding",
                3,
                FieldKind::Enum(repeated_field_encoding),
            )
            .with_targets(&[FeatureTarget::Field, FeatureTarget::File])
            .with_edition_default(MINIMUM_SUPPORTED_EDITION, "PACKED"),
        )
        .with_field(
            FieldSchema::new("utf8_validation", 4, FieldKind::Enum(utf8_validation))
                .with_targets(&[FeatureTarget::Field, FeatureTarget::File])
                .with_edition_default(MINIMUM_SUPPORTED_EDITION, "VERIFY"),
        )
        .with_field(
            FieldSchema::new("message_encoding", 5, FieldKind::Enum(message_encoding))
                .with_targets(&[FeatureTarget::Field, FeatureTarget::File])
                .with_edition_default(MINIMUM_SUPPORTED_EDITION, "LENGTH_PREFIXED"),
        )
        .with_field(
            FieldSchema::new("json_format", 6, FieldKind::Enum(json_format))
                .with_targets(&[
                    FeatureTarget::Message,
                    FeatureTarget::Enum,
                    FeatureTarget::File,
                ])
                .with_edition_default(MINIMUM_SUPPORTED_EDITION, "ALLOW"),
        )
}

/// Compile the standard container over its supported edition range
pub fn compile_standard_defaults() -> Result<FeatureSetDefaults> {
    compile_defaults(
        &standard_features(),
        &[],
        &Edition::from(MINIMUM_SUPPORTED_EDITION),
        &Edition::from(MAXIMUM_SUPPORTED_EDITION),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureValue;
    use crate::resolver::FeatureResolver;
    use crate::validate::validate_container;

    #[test]
    fn test_standard_container_is_valid() {
        assert!(validate_container(&standard_features()).is_ok());
    }

    #[test]
    fn test_standard_defaults_compile() {
        let defaults = compile_standard_defaults().unwrap();
        assert_eq!(defaults.minimum_edition, Edition::from("2023"));
        assert_eq!(defaults.maximum_edition, Edition::from("2024"));
        assert_eq!(defaults.defaults.len(), 1);
    }

    #[test]
    fn test_every_standard_feature_resolves_non_zero() {
        let defaults = compile_standard_defaults().unwrap();
        let resolver = FeatureResolver::create(&Edition::from("2023"), &defaults).unwrap();
        let resolved = resolver
            .merge(&Default::default(), &Default::default())
            .unwrap();

        for field in &standard_features().fields {
            match resolved.get(&field.name) {
                Some(FeatureValue::Enum { number, .. }) => {
                    assert_ne!(*number, 0, "feature {} resolved to zero", field.name)
                }
                other => panic!("feature {} missing or non-enum: {other:?}", field.name),
            }
        }
    }
}
