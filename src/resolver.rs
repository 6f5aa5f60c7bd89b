//! Edition-bound feature resolution
//!
//! A [`FeatureResolver`] is created from a compiled defaults table and a
//! single target edition. Creation checks the edition against the table's
//! range, verifies the rows are strictly increasing, and captures the
//! defaults of the latest row at or below the target. The resolver is
//! immutable afterwards and safe to share across threads; `merge` takes
//! its inputs by reference and returns a new value.

use tracing::debug;

use crate::defaults::FeatureSetDefaults;
use crate::edition::Edition;
use crate::error::{FeatureError, Result};
use crate::features::{FeatureSet, FeatureValue};

/// Resolves effective feature sets at a fixed edition
#[derive(Debug, Clone)]
pub struct FeatureResolver {
    defaults: FeatureSet,
}

impl FeatureResolver {
    /// Bind a resolver to `edition`, selecting its default row from
    /// `compiled`
    pub fn create(edition: &Edition, compiled: &FeatureSetDefaults) -> Result<Self> {
        if *edition < compiled.minimum_edition {
            return Err(FeatureError::EditionBelowMin {
                edition: edition.clone(),
                minimum: compiled.minimum_edition.clone(),
            });
        }
        if compiled.maximum_edition < *edition {
            return Err(FeatureError::EditionAboveMax {
                edition: edition.clone(),
                maximum: compiled.maximum_edition.clone(),
            });
        }

        for window in compiled.defaults.windows(2) {
            if window[0].edition >= window[1].edition {
                return Err(FeatureError::DefaultsNotMonotone {
                    prev: window[0].edition.clone(),
                    next: window[1].edition.clone(),
                });
            }
        }

        let first_nonmatch = compiled
            .defaults
            .partition_point(|row| row.edition <= *edition);
        if first_nonmatch == 0 {
            return Err(FeatureError::NoDefaultForEdition {
                edition: edition.clone(),
                field: None,
            });
        }
        let row = &compiled.defaults[first_nonmatch - 1];
        debug!(edition = %edition, selected = %row.edition, "selected edition defaults");

        Ok(Self {
            defaults: row.features()?,
        })
    }

    /// The edition defaults captured at creation
    pub fn defaults(&self) -> &FeatureSet {
        &self.defaults
    }

    /// Compute the effective features of a child element
    ///
    /// Overlays the parent's effective features and then the child's
    /// declared features on top of the edition defaults, so precedence is
    /// child over parent over defaults, message fields composing
    /// recursively.
    pub fn merge(&self, parent: &FeatureSet, child: &FeatureSet) -> Result<FeatureSet> {
        let mut merged = self.defaults.clone();
        merged.merge_from(parent);
        merged.merge_from(child);

        validate_merged(&merged, "")?;

        Ok(merged)
    }
}

/// Reject merged sets in which any enum feature resolved to the zero
/// sentinel, which every enum reserves to mean "unknown"
fn validate_merged(features: &FeatureSet, prefix: &str) -> Result<()> {
    for (name, value) in features.iter() {
        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        };
        match value {
            FeatureValue::Enum { name: value_name, number } => {
                if *number == 0 {
                    return Err(FeatureError::UnknownEnumValue {
                        field: path,
                        value: value_name.clone(),
                    });
                }
            }
            FeatureValue::Message(sub) => validate_merged(sub, &path)?,
            _ => {}
        }
    }
    Ok(())
}
