//! Configuration error types.

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The container element named at attach time does not exist in the
    /// page. Attach logs this and creates no instance.
    #[error("container element `#{0}` not found")]
    MissingElement(String),

    /// An options blob failed to deserialize.
    #[error("options blob parsing error")]
    Json(#[from] serde_json::Error),

    /// The `option` accessor was asked for a field outside the closed set.
    #[error("unknown config field `{0}`")]
    UnknownField(String),

    /// The `option` accessor was given a value the field cannot hold.
    #[error("invalid value `{value}` for config field `{field}`")]
    InvalidValue { field: &'static str, value: String },
}
