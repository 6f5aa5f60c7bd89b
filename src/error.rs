//! Error types for feature resolution

use thiserror::Error;

use crate::edition::Edition;

/// Result type for feature resolution operations
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Feature resolution errors
///
/// Every variant names the offending entity (field full name, edition
/// string, or extension full name) so callers can report actionable
/// diagnostics. All of these are precondition failures: the first error
/// encountered aborts the operation and no partial result is exposed.
#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("unsupported feature shape: {0}")]
    UnsupportedShape(String),

    #[error("unknown extension of {0}")]
    UnknownExtension(String),

    #[error("extension {extension} is not an extension of {base}")]
    NotAnExtensionOf { extension: String, base: String },

    #[error(
        "feature extension {0} is not of message type; feature extensions \
         should always use messages to allow for evolution"
    )]
    NotMessageTyped(String),

    #[error("only singular feature extensions are supported, found repeated extension {0}")]
    RepeatedExtension(String),

    #[error("nested extensions in feature extension {0} are not supported")]
    NestedExtensions(String),

    #[error(
        "no valid default found for edition {edition}{}",
        .field.as_ref().map(|f| format!(" in feature field {f}")).unwrap_or_default()
    )]
    NoDefaultForEdition {
        edition: Edition,
        field: Option<String>,
    },

    #[error("parsing error in edition default for feature field {field}, could not parse: {text}")]
    MalformedDefault { field: String, text: String },

    #[error("edition {edition} is earlier than the minimum supported edition {minimum}")]
    EditionBelowMin { edition: Edition, minimum: Edition },

    #[error("edition {edition} is later than the maximum supported edition {maximum}")]
    EditionAboveMax { edition: Edition, maximum: Edition },

    #[error(
        "feature set defaults are not strictly increasing: edition {prev} is \
         greater than or equal to edition {next}"
    )]
    DefaultsNotMonotone { prev: Edition, next: Edition },

    #[error("feature field {field} must resolve to a known value, found {value}")]
    UnknownEnumValue { field: String, value: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
