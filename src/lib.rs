//! Feature Resolver
//!
//! Computes the effective set of schema "features" that apply to a
//! descriptor element at a particular schema edition. Individual
//! behaviors of the schema language are controlled by named feature
//! fields whose defaults change at edition boundaries; user code may
//! override them, and overrides inherit lexically down the descriptor
//! tree.
//!
//! ## Features
//!
//! - **Defaults compilation**: a base feature container plus extension
//!   containers compile into a serialized per-edition defaults table
//! - **Edition ordering**: a single total order over dotted edition
//!   strings drives every sort, lookup, and range check
//! - **Layered merge**: child features override parent features override
//!   edition defaults, with message fields composing recursively
//! - **Validation**: container shapes, extension shapes, and merged enum
//!   values are all checked, with errors naming the offending entity
//!
//! ## Pipeline
//!
//! ```text
//! MessageSchema + ExtensionField[]
//!         |
//!         v  compile_defaults(base, extensions, min, max)
//! FeatureSetDefaults        one row per edition, serialized features
//!         |
//!         v  FeatureResolver::create(edition, defaults)
//! FeatureResolver           immutable, bound to one edition
//!         |
//!         v  merge(parent, child)     (repeatedly, per descriptor element)
//! FeatureSet                effective features for the element
//! ```

pub mod catalog;
pub mod checksum;
pub mod defaults;
pub mod edition;
pub mod error;
pub mod features;
pub mod resolver;
pub mod schema;
pub mod textual;
pub mod validate;

pub use checksum::Checksum;
pub use defaults::{compile_defaults, FeatureSetDefaults, FeatureSetEditionDefault};
pub use edition::Edition;
pub use error::{FeatureError, Result};
pub use features::{FeatureSet, FeatureValue};
pub use resolver::FeatureResolver;
pub use schema::{
    Cardinality, EditionDefault, EnumSchema, EnumValueSchema, ExtensionField, FeatureTarget,
    FieldKind, FieldSchema, MessageSchema,
};
pub use validate::{validate_container, validate_extension};
