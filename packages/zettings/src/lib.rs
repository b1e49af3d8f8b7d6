//! Persistent application settings addressed by dotted keys.
//!
//! A [`Settings`] store keeps a nested tree of values in a TOML file and
//! exposes it through keys like `editor.font.size`:
//! - every read reloads the file first (unless `auto_reload` is off)
//! - every write rewrites the whole file
//! - defaults are seeded only for keys that are missing
//! - `read_only` stores refuse mutation; `ram_only` stores never touch disk
//! - new files are stamped with a notice and created/updated timestamps
//!
//! The pure tree engine lives in `zettings-core`, the TOML codec in
//! `zettings-serde`.
//!
//! # Example
//!
//! ```rust,no_run
//! use zettings::{tree, Settings};
//!
//! let settings = Settings::builder("my-app")
//!     .defaults(tree! { "editor" => tree! { "font" => "mono", "size" => 12 } })
//!     .build()?;
//!
//! settings.set("editor.size", 14)?;
//! assert_eq!(settings.get_as::<u32>("editor.size")?, Some(14));
//! # Ok::<(), zettings::Error>(())
//! ```

mod error;
mod location;
mod metadata;
mod settings;
mod storage;

pub use error::Error;
pub use location::{location_under, HomeDirResolver, LocationResolver, SETTINGS_FILE_NAME};
pub use metadata::{timestamp, CREATED_KEY, NOTICE, NOTICE_KEY, UPDATED_KEY};
pub use settings::{Settings, SettingsBuilder};

pub use zettings_core::{tree, Codec, Tree, Value};
pub use zettings_serde::TomlCodec;
