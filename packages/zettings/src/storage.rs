//! Whole-file reads and writes of the backing resource.
//!
//! Files are opened and closed within each call; nothing is held open.

use std::path::Path;
use std::{fs, io};

use bytes::Bytes;

use crate::Error;

/// Read the whole file, or `None` if it does not exist yet.
pub(crate) fn read(path: &Path) -> Result<Option<Bytes>, Error> {
    log::debug!("Reading {}...", path.display());
    match fs::read(path) {
        Ok(contents) => Ok(Some(Bytes::from(contents))),
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            log::debug!("{} does not exist yet", path.display());
            Ok(None)
        }
        Err(error) => Err(Error::io(path, error)),
    }
}

/// Replace the whole file with `contents`.
pub(crate) fn write(path: &Path, contents: &[u8]) -> Result<(), Error> {
    log::debug!("Writing {}...", path.display());
    fs::write(path, contents).map_err(|error| Error::io(path, error))
}

pub(crate) fn exists(path: &Path) -> bool {
    path.exists()
}

pub(crate) fn ensure_parent_dirs(path: &Path) -> Result<(), Error> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|error| Error::io(parent, error))
        }
        _ => Ok(()),
    }
}
