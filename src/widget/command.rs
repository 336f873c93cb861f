//! Public method dispatch as a closed command set.
//!
//! The string-named entry point (`invoke`) resolves to one of these
//! commands before touching any instance; unknown names fail explicitly
//! with [`WidgetError::UnknownMethod`] rather than silently doing nothing.

use super::WidgetError;

/// A public widget method plus its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Read (`value: None`) or update a single config field.
    Option {
        key: &'a str,
        value: Option<&'a str>,
    },
    /// Tear the widget down.
    Destroy,
}

impl<'a> Command<'a> {
    /// Resolve a method name and argument list to a command.
    ///
    /// Wrong arity counts as an unknown method: there is no `option`
    /// without a key and no `destroy` with arguments.
    pub fn parse(method: &str, args: &'a [&'a str]) -> Result<Self, WidgetError> {
        match (method, args) {
            ("option", &[key]) => Ok(Self::Option { key, value: None }),
            ("option", &[key, value]) => Ok(Self::Option {
                key,
                value: Some(value),
            }),
            ("destroy", &[]) => Ok(Self::Destroy),
            _ => Err(WidgetError::UnknownMethod(method.to_string())),
        }
    }
}
