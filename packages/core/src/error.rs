//! Error types for the engine layer.

/// Errors raised while validating keys and values or navigating a [`Tree`].
///
/// Every variant carries enough context to tell the caller which key was at
/// fault. None of these errors leave a tree partially modified.
///
/// [`Tree`]: crate::Tree
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A key or one of its segments does not match `[A-Za-z0-9_-]+`.
    #[error("Invalid key: '{key}'. Keys must be alphanumeric, underscores, or dashes.")]
    InvalidKey { key: String },

    /// Navigation reached a segment that is absent. Carries the full key.
    #[error("Key not found: '{key}'.")]
    KeyNotFound { key: String },

    /// A mapping was expected at `key` but a plain value was found.
    #[error("Key '{key}' is expected to be a mapping but is not.")]
    MappingConflict { key: String },

    /// An absent (null) value was offered for storage.
    #[error("Invalid value '{value}' for key '{key}'.")]
    InvalidValue { key: String, value: String },

    /// A codec could not parse the bytes of a backing resource.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// A codec could not serialize a tree.
    #[error("encode error: {message}")]
    Encode { message: String },
}

impl Error {
    pub(crate) fn invalid_key(key: impl Into<String>) -> Self {
        Error::InvalidKey { key: key.into() }
    }

    pub(crate) fn not_found(key: impl Into<String>) -> Self {
        Error::KeyNotFound { key: key.into() }
    }

    pub(crate) fn conflict(key: impl Into<String>) -> Self {
        Error::MappingConflict { key: key.into() }
    }

    /// Build a decode error from any displayable cause.
    pub fn decode(message: impl ToString) -> Self {
        Error::Decode {
            message: message.to_string(),
        }
    }

    /// Build an encode error from any displayable cause.
    pub fn encode(message: impl ToString) -> Self {
        Error::Encode {
            message: message.to_string(),
        }
    }
}
