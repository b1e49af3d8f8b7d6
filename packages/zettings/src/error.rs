//! Error types for the settings store.

use std::io;
use std::path::PathBuf;

/// Errors raised by [`Settings`](crate::Settings).
///
/// Key, value and codec problems come from the engine and are wrapped in
/// [`Error::Core`]; the remaining variants are about the store itself.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] zettings_core::Error),

    #[error("Settings are in read only mode and cannot be modified.")]
    ReadOnly,

    #[error("Conflicting parameters: {message}")]
    ConflictingParameters { message: String },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to determine the home directory for the default settings location.")]
    NoHomeDirectory,
}

impl Error {
    /// The engine error underneath, if this is one.
    pub fn core(&self) -> Option<&zettings_core::Error> {
        match self {
            Error::Core(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_invalid_key(&self) -> bool {
        matches!(self.core(), Some(zettings_core::Error::InvalidKey { .. }))
    }

    pub fn is_key_not_found(&self) -> bool {
        matches!(self.core(), Some(zettings_core::Error::KeyNotFound { .. }))
    }

    pub fn is_mapping_conflict(&self) -> bool {
        matches!(self.core(), Some(zettings_core::Error::MappingConflict { .. }))
    }

    pub fn is_invalid_value(&self) -> bool {
        matches!(self.core(), Some(zettings_core::Error::InvalidValue { .. }))
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
