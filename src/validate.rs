//! Feature container schema validation
//!
//! Gates input into the defaults compiler: feature containers must be
//! plain singular-field messages (no oneofs, no required or repeated
//! fields, every field targeted), and extensions of the base must be
//! singular, message-typed, and free of further extension machinery.
//! Both checks are pure and name the offending entity in their errors.

use crate::error::{FeatureError, Result};
use crate::schema::{ExtensionField, MessageSchema};

/// Validate a feature container schema (the base or an extension payload)
pub fn validate_container(schema: &MessageSchema) -> Result<()> {
    if !schema.oneofs.is_empty() {
        return Err(FeatureError::UnsupportedShape(format!(
            "type {} contains unsupported oneof feature fields",
            schema.full_name
        )));
    }

    for field in &schema.fields {
        if field.cardinality.is_required() {
            return Err(FeatureError::UnsupportedShape(format!(
                "feature field {} is an unsupported required field",
                field.full_name
            )));
        }
        if field.cardinality.is_repeated() {
            return Err(FeatureError::UnsupportedShape(format!(
                "feature field {} is an unsupported repeated field",
                field.full_name
            )));
        }
        if field.targets.is_empty() {
            return Err(FeatureError::UnsupportedShape(format!(
                "feature field {} has no target specified",
                field.full_name
            )));
        }
    }

    Ok(())
}

/// Validate an extension field against the base feature container
pub fn validate_extension(
    base: &MessageSchema,
    extension: Option<&ExtensionField>,
) -> Result<()> {
    let extension = match extension {
        Some(extension) => extension,
        None => return Err(FeatureError::UnknownExtension(base.full_name.clone())),
    };

    if extension.extendee != base.full_name {
        return Err(FeatureError::NotAnExtensionOf {
            extension: extension.full_name.clone(),
            base: base.full_name.clone(),
        });
    }

    let payload = match &extension.payload {
        Some(payload) => payload,
        None => return Err(FeatureError::NotMessageTyped(extension.full_name.clone())),
    };

    if extension.cardinality.is_repeated() {
        return Err(FeatureError::RepeatedExtension(extension.full_name.clone()));
    }

    if !payload.extensions.is_empty() || !payload.extension_ranges.is_empty() {
        return Err(FeatureError::NestedExtensions(extension.full_name.clone()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Cardinality, FeatureTarget, FieldKind, FieldSchema};

    fn targeted_field(name: &str) -> FieldSchema {
        FieldSchema::new(name, 1, FieldKind::Bool)
            .with_targets(&[FeatureTarget::Field])
            .with_edition_default("2023", "true")
    }

    fn valid_base() -> MessageSchema {
        MessageSchema::new("features.FeatureSet").with_field(targeted_field("flag"))
    }

    #[test]
    fn test_valid_container_passes() {
        assert!(validate_container(&valid_base()).is_ok());
    }

    #[test]
    fn test_oneof_container_is_rejected() {
        let schema = valid_base().with_oneof("choice");
        let err = validate_container(&schema).unwrap_err();
        assert!(err.to_string().contains("oneof"));
    }

    #[test]
    fn test_required_field_is_rejected() {
        let schema = MessageSchema::new("features.FeatureSet")
            .with_field(targeted_field("flag").with_cardinality(Cardinality::Required));
        let err = validate_container(&schema).unwrap_err();
        assert!(err.to_string().contains("required"));
        assert!(err.to_string().contains("features.FeatureSet.flag"));
    }

    #[test]
    fn test_repeated_field_is_rejected() {
        let schema = MessageSchema::new("features.FeatureSet")
            .with_field(targeted_field("flag").with_cardinality(Cardinality::Repeated));
        assert!(validate_container(&schema)
            .unwrap_err()
            .to_string()
            .contains("repeated"));
    }

    #[test]
    fn test_untargeted_field_is_rejected() {
        let schema = MessageSchema::new("features.FeatureSet")
            .with_field(FieldSchema::new("flag", 1, FieldKind::Bool));
        assert!(validate_container(&schema)
            .unwrap_err()
            .to_string()
            .contains("no target"));
    }

    #[test]
    fn test_missing_extension_is_rejected() {
        let err = validate_extension(&valid_base(), None).unwrap_err();
        assert!(matches!(err, FeatureError::UnknownExtension(_)));
    }

    #[test]
    fn test_foreign_extension_is_rejected() {
        let ext = ExtensionField::new(
            "lang.features",
            9000,
            "other.Container",
            MessageSchema::new("lang.Features"),
        );
        let err = validate_extension(&valid_base(), Some(&ext)).unwrap_err();
        assert!(matches!(err, FeatureError::NotAnExtensionOf { .. }));
    }

    #[test]
    fn test_scalar_extension_is_rejected() {
        let ext = ExtensionField::scalar("lang.features", 9000, "features.FeatureSet");
        let err = validate_extension(&valid_base(), Some(&ext)).unwrap_err();
        assert!(matches!(err, FeatureError::NotMessageTyped(_)));
    }

    #[test]
    fn test_repeated_extension_is_rejected() {
        let ext = ExtensionField::new(
            "lang.features",
            9000,
            "features.FeatureSet",
            MessageSchema::new("lang.Features"),
        )
        .with_cardinality(Cardinality::Repeated);
        let err = validate_extension(&valid_base(), Some(&ext)).unwrap_err();
        assert!(matches!(err, FeatureError::RepeatedExtension(_)));
    }

    #[test]
    fn test_nested_extensions_are_rejected() {
        let payload = MessageSchema::new("lang.Features").with_extension_range(1000, 2000);
        let ext = ExtensionField::new("lang.features", 9000, "features.FeatureSet", payload);
        let err = validate_extension(&valid_base(), Some(&ext)).unwrap_err();
        assert!(matches!(err, FeatureError::NestedExtensions(_)));
    }
}
