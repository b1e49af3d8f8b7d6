//! Zettings engine: dotted keys over nested settings trees.
//!
//! This layer is pure and synchronous. It knows nothing about files:
//! - `Key`: a validated dotted key (`editor.font.size`)
//! - `Value` / `Tree`: the closed set of storable values and the ordered map
//!   holding them
//! - `get` / `set` / `delete`: path navigation with strict reads and
//!   auto-vivifying writes
//! - `validate_tree`, `merge_defaults`, `count`: whole-tree helpers
//! - `Codec`: the seam a store uses to turn trees into bytes and back
//!
//! # Example
//!
//! ```rust
//! use zettings_core::{get, set, Tree, Value};
//!
//! let mut tree = Tree::new();
//! set(&mut tree, "window.width", Value::from(800), '.').unwrap();
//! assert_eq!(get(&tree, "window.width", '.').unwrap(), &Value::from(800));
//! ```

pub use bytes::Bytes;

mod codec;
mod error;
mod key;
mod tree;
mod value;

pub use codec::Codec;
pub use error::Error;
pub use key::{is_valid_key, is_valid_segment, validate_key, Key, DEFAULT_SEPARATOR};
pub use tree::{contains, count, delete, get, merge_defaults, set, validate_tree, validate_value};
pub use value::{Tree, Value};
