//! The settings store.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use zettings_core::{Codec, Tree, Value, DEFAULT_SEPARATOR};
use zettings_serde::TomlCodec;

use crate::location::{HomeDirResolver, LocationResolver};
use crate::{metadata, storage, Error};

/// Persistent settings addressed by dotted keys.
///
/// A `Settings` wraps one nested [`Tree`] and keeps it in sync with a TOML
/// file:
///
/// - with `auto_reload` (the default) every read and write starts by
///   reloading the whole file, so changes made by another instance show up;
/// - every successful `set`/`delete` rewrites the whole file;
/// - `read_only` refuses mutation; `ram_only` never touches the disk.
///
/// The store is `Send + Sync` and every operation takes `&self`. File reads
/// and writes are serialized by a lock, but a reload-mutate-persist cycle as
/// a whole is not atomic: concurrent writers to the same file race and the
/// last write wins.
///
/// # Example
///
/// ```rust,no_run
/// use zettings::{Settings, Value};
///
/// let settings = Settings::builder("my-app")
///     .default("window.width", 800)
///     .build()
///     .unwrap();
///
/// settings.set("theme", "dark").unwrap();
/// assert_eq!(settings.get("window.width").unwrap(), Some(Value::from(800)));
/// ```
pub struct Settings {
    name: String,
    location: Option<PathBuf>,
    ram_only: bool,
    save_metadata: bool,
    auto_reload: AtomicBool,
    read_only: AtomicBool,
    codec: Box<dyn Codec>,
    tree: RwLock<Tree>,
    io_lock: Mutex<()>,
}

impl Settings {
    /// Open (or create) the settings called `name` with every option at its
    /// default. The file lives at `<home>/.<name>/settings.toml`.
    pub fn new(name: impl Into<String>) -> Result<Settings, Error> {
        Self::builder(name).build()
    }

    pub fn builder(name: impl Into<String>) -> SettingsBuilder {
        SettingsBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The backing file. `None` for ram-only settings.
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    pub fn ram_only(&self) -> bool {
        self.ram_only
    }

    pub fn save_metadata(&self) -> bool {
        self.save_metadata
    }

    pub fn auto_reload(&self) -> bool {
        self.auto_reload.load(Ordering::SeqCst)
    }

    pub fn set_auto_reload(&self, auto_reload: bool) {
        self.auto_reload.store(auto_reload, Ordering::SeqCst);
    }

    pub fn read_only(&self) -> bool {
        self.read_only.load(Ordering::SeqCst)
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Get the value at `key`, or `None` if nothing is stored there.
    ///
    /// Subtrees come back whole as `Value::Tree`.
    ///
    /// # Errors
    ///
    /// `InvalidKey` for malformed keys, plus any reload failure.
    pub fn get(&self, key: &str) -> Result<Option<Value>, Error> {
        self.reload_if_auto()?;

        match zettings_core::get(&self.read_tree(), key, DEFAULT_SEPARATOR) {
            Ok(value) => Ok(Some(value.clone())),
            Err(zettings_core::Error::KeyNotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the value at `key`, or `fallback` if nothing is stored there.
    pub fn get_or(&self, key: &str, fallback: impl Into<Value>) -> Result<Value, Error> {
        Ok(self.get(key)?.unwrap_or_else(|| fallback.into()))
    }

    /// Get the value at `key` deserialized into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        match self.get(key)? {
            Some(value) => Ok(Some(zettings_serde::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub fn exists(&self, key: &str) -> Result<bool, Error> {
        self.reload_if_auto()?;
        Ok(zettings_core::contains(
            &self.read_tree(),
            key,
            DEFAULT_SEPARATOR,
        )?)
    }

    /// Store `value` at `key` and rewrite the backing file.
    ///
    /// Missing intermediate trees are created.
    ///
    /// # Errors
    ///
    /// - `ReadOnly` before anything is reloaded or touched.
    /// - `InvalidKey`, `InvalidValue`, `MappingConflict` from the engine; the
    ///   tree is unchanged and nothing is written.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<(), Error> {
        if self.read_only() {
            return Err(Error::ReadOnly);
        }
        self.reload_if_auto()?;

        zettings_core::set(
            &mut self.write_tree(),
            key,
            value.into(),
            DEFAULT_SEPARATOR,
        )?;
        self.persist()
    }

    /// Remove the entry at `key`, returning it, and rewrite the backing file.
    ///
    /// Sibling entries are kept; an emptied parent tree stays in place.
    pub fn delete(&self, key: &str) -> Result<Value, Error> {
        if self.read_only() {
            return Err(Error::ReadOnly);
        }
        self.reload_if_auto()?;

        let removed = zettings_core::delete(&mut self.write_tree(), key, DEFAULT_SEPARATOR)?;
        self.persist()?;
        Ok(removed)
    }

    /// Top-level keys in insertion order.
    ///
    /// Each call reloads (when enabled) and iterates over a fresh snapshot.
    pub fn keys(&self) -> Result<impl Iterator<Item = String>, Error> {
        self.reload_if_auto()?;
        let keys: Vec<String> = self.read_tree().keys().cloned().collect();
        Ok(keys.into_iter())
    }

    /// Number of entries at every depth; a subtree counts itself and each
    /// of its descendants.
    pub fn count(&self) -> Result<usize, Error> {
        self.reload_if_auto()?;
        Ok(zettings_core::count(&self.read_tree()))
    }

    /// A copy of the whole tree.
    pub fn tree(&self) -> Result<Tree, Error> {
        self.reload_if_auto()?;
        Ok(self.read_tree().clone())
    }

    /// Replace the in-memory tree with the contents of the backing file.
    ///
    /// A file that does not exist yet reads as an empty tree. Does nothing
    /// for ram-only settings.
    pub fn reload(&self) -> Result<(), Error> {
        let Some(path) = self.location.as_deref() else {
            return Ok(());
        };

        let bytes = {
            let _io = self.io_lock.lock().unwrap_or_else(PoisonError::into_inner);
            storage::read(path)?
        };
        let tree = match bytes {
            Some(bytes) => self.codec.decode(&bytes)?,
            None => Tree::new(),
        };
        *self.write_tree() = tree;
        Ok(())
    }

    fn reload_if_auto(&self) -> Result<(), Error> {
        if self.auto_reload() {
            self.reload()?;
        }
        Ok(())
    }

    /// Refresh the updated timestamp and write the whole tree out.
    fn persist(&self) -> Result<(), Error> {
        let Some(path) = self.location.as_deref() else {
            return Ok(());
        };

        let bytes = {
            let mut tree = self.write_tree();
            if self.save_metadata {
                metadata::touch(&mut tree)?;
            }
            self.codec.encode(&tree)?
        };

        let _io = self.io_lock.lock().unwrap_or_else(PoisonError::into_inner);
        storage::write(path, &bytes)
    }

    /// Create the backing file, stamped with metadata, if it is missing.
    fn initialize_file(&self) -> Result<(), Error> {
        let Some(path) = self.location.as_deref() else {
            return Ok(());
        };
        if storage::exists(path) {
            return Ok(());
        }

        storage::ensure_parent_dirs(path)?;
        if self.save_metadata {
            metadata::stamp_new(&mut self.write_tree())?;
        }
        log::info!("Creating settings file {}", path.display());
        self.persist()
    }

    /// Seed defaults for every key not already present.
    fn initialize_defaults(&self, defaults: &Tree) -> Result<(), Error> {
        if defaults.is_empty() {
            return Ok(());
        }
        self.reload_if_auto()?;

        let seeded =
            zettings_core::merge_defaults(&mut self.write_tree(), defaults, DEFAULT_SEPARATOR)?;
        log::trace!("Seeded {} default(s) into settings `{}`", seeded, self.name);
        if seeded > 0 {
            self.persist()?;
        }
        Ok(())
    }

    fn read_tree(&self) -> RwLockReadGuard<'_, Tree> {
        self.tree.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_tree(&self) -> RwLockWriteGuard<'_, Tree> {
        self.tree.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(path) => write!(
                f,
                "Settings `{}`. File stored at: {}",
                self.name,
                path.display()
            ),
            None => write!(f, "Settings `{}`. File stored at: <ram only>", self.name),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("name", &self.name)
            .field("location", &self.location)
            .field("ram_only", &self.ram_only)
            .field("auto_reload", &self.auto_reload())
            .field("read_only", &self.read_only())
            .field("save_metadata", &self.save_metadata)
            .finish_non_exhaustive()
    }
}

/// Options for opening [`Settings`].
///
/// | option          | default                          |
/// |-----------------|----------------------------------|
/// | `defaults`      | empty                            |
/// | `location`      | resolved from the name           |
/// | `ram_only`      | `false`                          |
/// | `auto_reload`   | `true`                           |
/// | `read_only`     | `false`                          |
/// | `save_metadata` | `true`                           |
/// | `codec`         | [`TomlCodec`]                    |
/// | `resolver`      | [`HomeDirResolver`]              |
pub struct SettingsBuilder {
    name: String,
    defaults: Tree,
    location: Option<PathBuf>,
    ram_only: bool,
    auto_reload: bool,
    read_only: bool,
    save_metadata: bool,
    codec: Box<dyn Codec>,
    resolver: Box<dyn LocationResolver>,
}

impl SettingsBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            defaults: Tree::new(),
            location: None,
            ram_only: false,
            auto_reload: true,
            read_only: false,
            save_metadata: true,
            codec: Box::new(TomlCodec),
            resolver: Box::new(HomeDirResolver),
        }
    }

    /// Defaults seeded for keys missing from the file. Keys may be dotted.
    pub fn defaults(mut self, defaults: Tree) -> Self {
        self.defaults = defaults;
        self
    }

    /// Add a single default. The key may be dotted.
    pub fn default(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    /// Use an explicit backing file. Conflicts with `ram_only`.
    pub fn location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn ram_only(mut self, ram_only: bool) -> Self {
        self.ram_only = ram_only;
        self
    }

    pub fn auto_reload(mut self, auto_reload: bool) -> Self {
        self.auto_reload = auto_reload;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn save_metadata(mut self, save_metadata: bool) -> Self {
        self.save_metadata = save_metadata;
        self
    }

    pub fn codec(mut self, codec: impl Codec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    /// How to derive the backing file when no `location` is given.
    pub fn resolver(mut self, resolver: impl LocationResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Open the settings.
    ///
    /// Unless read-only, a missing backing file is created (stamped with
    /// metadata when enabled) and defaults are seeded for absent keys.
    /// Defaults are validated first in every mode.
    ///
    /// # Errors
    ///
    /// - `InvalidKey` if the name is not a single valid key segment.
    /// - `ConflictingParameters` if both `location` and `ram_only` are set.
    /// - `InvalidKey` / `InvalidValue` for malformed defaults.
    /// - `MappingConflict` if two defaults contradict each other.
    pub fn build(self) -> Result<Settings, Error> {
        if !zettings_core::is_valid_segment(&self.name) {
            return Err(zettings_core::Error::InvalidKey { key: self.name }.into());
        }
        if self.ram_only && self.location.is_some() {
            return Err(Error::ConflictingParameters {
                message: "Cannot set `location` when `ram_only` is true.".to_string(),
            });
        }

        let location = match (self.ram_only, self.location) {
            (true, _) => None,
            (false, Some(location)) => Some(location),
            (false, None) => Some(self.resolver.resolve(&self.name)?),
        };

        zettings_core::validate_tree(&self.defaults, DEFAULT_SEPARATOR)?;

        let settings = Settings {
            name: self.name,
            location,
            ram_only: self.ram_only,
            save_metadata: self.save_metadata,
            auto_reload: AtomicBool::new(self.auto_reload),
            read_only: AtomicBool::new(self.read_only),
            codec: self.codec,
            tree: RwLock::new(Tree::new()),
            io_lock: Mutex::new(()),
        };

        if settings.location.as_deref().is_some_and(storage::exists) {
            settings.reload()?;
        }

        if !self.read_only {
            settings.initialize_file()?;
            settings.initialize_defaults(&self.defaults)?;
        }

        Ok(settings)
    }
}
