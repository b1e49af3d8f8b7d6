//! The codec seam between settings trees and bytes.

use bytes::Bytes;

use crate::{Error, Tree};

/// Converts whole settings trees to and from a document format.
///
/// The engine never touches files itself: a store hands the full contents
/// of its backing resource to `decode` and writes back whatever `encode`
/// returns. There is no partial or streaming variant.
///
/// # Object Safety
///
/// This trait is object-safe: stores hold a `Box<dyn Codec>`.
pub trait Codec: Send + Sync {
    /// Parse a complete document into a tree.
    fn decode(&self, bytes: &Bytes) -> Result<Tree, Error>;

    /// Serialize a complete tree into a document.
    fn encode(&self, tree: &Tree) -> Result<Bytes, Error>;
}

impl<T: Codec + ?Sized> Codec for Box<T> {
    fn decode(&self, bytes: &Bytes) -> Result<Tree, Error> {
        self.as_ref().decode(bytes)
    }

    fn encode(&self, tree: &Tree) -> Result<Bytes, Error> {
        self.as_ref().encode(tree)
    }
}
