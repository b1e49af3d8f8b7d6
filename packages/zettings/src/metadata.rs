//! Bookkeeping keys written alongside user settings.

use chrono::Utc;
use zettings_core::{Tree, Value, DEFAULT_SEPARATOR};

pub const NOTICE_KEY: &str = "metadata.notice";
pub const NOTICE: &str = "This file was created by zettings.";
pub const CREATED_KEY: &str = "metadata.created";
pub const UPDATED_KEY: &str = "metadata.updated";

/// Current UTC time as ISO-8601, e.g. `2024-05-01T12:00:00.123456789+00:00`.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339()
}

/// Stamp the notice and both timestamps into a fresh tree.
pub(crate) fn stamp_new(tree: &mut Tree) -> Result<(), zettings_core::Error> {
    let now = timestamp();
    zettings_core::set(tree, NOTICE_KEY, Value::from(NOTICE), DEFAULT_SEPARATOR)?;
    zettings_core::set(tree, CREATED_KEY, Value::from(now.clone()), DEFAULT_SEPARATOR)?;
    zettings_core::set(tree, UPDATED_KEY, Value::from(now), DEFAULT_SEPARATOR)
}

/// Refresh the `updated` timestamp.
pub(crate) fn touch(tree: &mut Tree) -> Result<(), zettings_core::Error> {
    zettings_core::set(tree, UPDATED_KEY, Value::from(timestamp()), DEFAULT_SEPARATOR)
}
