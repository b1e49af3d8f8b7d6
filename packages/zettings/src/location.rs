//! Where a settings file lives when no explicit location is given.

use std::path::{Path, PathBuf};

use crate::Error;

/// File name used inside a settings directory.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Derives the backing file for a settings name.
///
/// Injected into the builder so nothing in the store looks up the
/// environment by itself. Any `Fn(&str) -> PathBuf` closure is a resolver.
pub trait LocationResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Result<PathBuf, Error>;
}

impl<F> LocationResolver for F
where
    F: Fn(&str) -> PathBuf + Send + Sync,
{
    fn resolve(&self, name: &str) -> Result<PathBuf, Error> {
        Ok(self(name))
    }
}

/// Resolves to `<home>/.<name>/settings.toml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HomeDirResolver;

impl LocationResolver for HomeDirResolver {
    fn resolve(&self, name: &str) -> Result<PathBuf, Error> {
        let home = dirs::home_dir().ok_or(Error::NoHomeDirectory)?;
        Ok(location_under(&home, name))
    }
}

/// The conventional settings path for `name` below `base`.
pub fn location_under(base: &Path, name: &str) -> PathBuf {
    base.join(format!(".{}", name)).join(SETTINGS_FILE_NAME)
}
