//! Widget-level error types.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the widget registry
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Method dispatch failed: no instance for the element, or the method
    /// is not part of the public command set. Explicit API misuse, so this
    /// propagates instead of being swallowed.
    #[error("could not call method `{0}` on share widget")]
    UnknownMethod(String),

    /// A share was requested for an element with no attached widget.
    #[error("no share widget attached to `#{0}`")]
    NotAttached(String),
}
