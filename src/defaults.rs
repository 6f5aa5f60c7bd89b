//! Defaults compilation
//!
//! Compiles a base feature container plus its extensions into a
//! [`FeatureSetDefaults`] table: one row per edition that changes any
//! default anywhere in the family, each row carrying a fully-populated,
//! serialized feature container. The table is bounded by an inclusive
//! `[minimum_edition, maximum_edition]` range and its rows are strictly
//! increasing under the edition order.
//!
//! Compilation happens once per configuration; the resulting artifact is
//! immutable and safe to share. Compiling the same inputs twice yields
//! byte-identical output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::checksum::Checksum;
use crate::edition::Edition;
use crate::error::{FeatureError, Result};
use crate::features::FeatureSet;
use crate::schema::{ExtensionField, FieldKind, MessageSchema};
use crate::textual;
use crate::validate::{validate_container, validate_extension};

/// One row of a compiled defaults table
///
/// `features` holds the interchange-format bytes of the populated feature
/// container for `edition`, extension payloads nested under their
/// extension field full names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSetEditionDefault {
    pub edition: Edition,
    pub features: Vec<u8>,
}

impl FeatureSetEditionDefault {
    /// Deserialize this row's feature container
    pub fn features(&self) -> Result<FeatureSet> {
        FeatureSet::from_bytes(&self.features)
    }
}

/// A compiled table of per-edition feature defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSetDefaults {
    pub minimum_edition: Edition,
    pub maximum_edition: Edition,
    pub defaults: Vec<FeatureSetEditionDefault>,
}

impl FeatureSetDefaults {
    /// Serialize the whole table to interchange-format bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Deserialize a table from interchange-format bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Checksum of the serialized table
    pub fn checksum(&self) -> Result<Checksum> {
        Ok(Checksum::from_bytes(&self.to_bytes()?))
    }
}

/// Compile per-edition defaults for a feature container family
///
/// Validates the base and every extension, collects each edition that
/// changes any default up to `maximum` (editions below `minimum` are kept;
/// the resolver rejects targets below the minimum separately), and builds
/// one fully-populated row per collected edition.
pub fn compile_defaults(
    base: &MessageSchema,
    extensions: &[ExtensionField],
    minimum: &Edition,
    maximum: &Edition,
) -> Result<FeatureSetDefaults> {
    validate_container(base)?;
    for extension in extensions {
        validate_extension(base, Some(extension))?;
        if let Some(payload) = &extension.payload {
            validate_container(payload)?;
        }
    }

    let mut editions: BTreeSet<Edition> = BTreeSet::new();
    collect_editions(base, maximum, &mut editions);
    for extension in extensions {
        if let Some(payload) = &extension.payload {
            collect_editions(payload, maximum, &mut editions);
        }
    }
    debug!(
        container = %base.full_name,
        extensions = extensions.len(),
        editions = editions.len(),
        "collected editions with distinct defaults"
    );

    let mut defaults = FeatureSetDefaults {
        minimum_edition: minimum.clone(),
        maximum_edition: maximum.clone(),
        defaults: Vec::with_capacity(editions.len()),
    };
    for edition in &editions {
        let mut features = FeatureSet::new();
        fill_defaults(edition, base, &mut features)?;
        for extension in extensions {
            if let Some(payload) = &extension.payload {
                fill_defaults(
                    edition,
                    payload,
                    features.sub_message_mut(&extension.full_name),
                )?;
            }
        }
        defaults.defaults.push(FeatureSetEditionDefault {
            edition: edition.clone(),
            features: features.to_bytes()?,
        });
    }
    Ok(defaults)
}

/// Collect every edition mentioned in a container's defaults, capped at
/// `maximum` (inclusive)
fn collect_editions(schema: &MessageSchema, maximum: &Edition, editions: &mut BTreeSet<Edition>) {
    for field in &schema.fields {
        for default in &field.edition_defaults {
            if *maximum < default.edition {
                continue;
            }
            editions.insert(default.edition.clone());
        }
    }
}

/// Populate every field of `msg` with its default at `edition`
///
/// Message-typed fields merge every qualifying default in ascending
/// edition order, so composite features accumulate additively across
/// editions. Scalar fields take only the latest qualifying default.
fn fill_defaults(edition: &Edition, schema: &MessageSchema, msg: &mut FeatureSet) -> Result<()> {
    for field in &schema.fields {
        msg.clear(&field.name);
        debug_assert!(!field.cardinality.is_repeated());

        let mut defaults = field.edition_defaults.clone();
        defaults.sort_by(|a, b| a.edition.cmp(&b.edition));
        let first_nonmatch = defaults.partition_point(|d| d.edition <= *edition);
        if first_nonmatch == 0 {
            return Err(FeatureError::NoDefaultForEdition {
                edition: edition.clone(),
                field: Some(field.full_name.clone()),
            });
        }

        if let FieldKind::Message(sub_schema) = &field.kind {
            let target = msg.sub_message_mut(&field.name);
            for default in &defaults[..first_nonmatch] {
                textual::merge_text_into(sub_schema, &default.value, target).map_err(|_| {
                    FeatureError::MalformedDefault {
                        field: field.full_name.clone(),
                        text: default.value.clone(),
                    }
                })?;
            }
        } else {
            let default = &defaults[first_nonmatch - 1];
            let value = textual::parse_field_value(field, &default.value).map_err(|_| {
                FeatureError::MalformedDefault {
                    field: field.full_name.clone(),
                    text: default.value.clone(),
                }
            })?;
            msg.set(&field.name, value);
        }
    }

    Ok(())
}
