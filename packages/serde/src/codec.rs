//! TOML codec implementation.

use bytes::Bytes;
use zettings_core::{Codec, Error, Tree};

use crate::convert::{table_to_tree, tree_to_table};

/// A codec that reads and writes settings files as TOML.
///
/// Documents are UTF-8. Key order is kept within each table, though TOML
/// itself requires plain values to be written before subtables, so a tree
/// that interleaves them comes back with its plain values first.
///
/// # Example
///
/// ```rust
/// use zettings_serde::TomlCodec;
/// use zettings_core::{tree, Codec};
///
/// let codec = TomlCodec;
/// let settings = tree! { "theme" => "dark", "window" => tree! { "width" => 800 } };
///
/// let bytes = codec.encode(&settings).unwrap();
/// assert_eq!(codec.decode(&bytes).unwrap(), settings);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlCodec;

impl Codec for TomlCodec {
    fn decode(&self, bytes: &Bytes) -> Result<Tree, Error> {
        let text = std::str::from_utf8(bytes).map_err(Error::decode)?;
        let table: toml::Table = text.parse().map_err(Error::decode)?;
        Ok(table_to_tree(table))
    }

    fn encode(&self, tree: &Tree) -> Result<Bytes, Error> {
        let table = tree_to_table(tree)?;
        let text = toml::to_string(&table).map_err(Error::encode)?;
        Ok(Bytes::from(text))
    }
}
