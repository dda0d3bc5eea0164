//! # Storage Layer
//!
//! The [`CatalogStore`] trait is the single source of truth for the books of a
//! session. Commands read the ordered catalog through it and write whole book
//! records back through it; nothing else holds book state.
//!
//! ## Implementations
//!
//! - [`memory::InMemoryStore`]: the only backend. Catalog state lives for the
//!   lifetime of the store value and starts from a seed.
//!
//! ## Ordering
//!
//! `list_books` returns books in catalog (seed) order. Replacing a book keeps
//! its position, so filtered views stay stable across borrow/return.

use crate::error::Result;
use crate::model::{Book, BookId};

pub mod memory;

/// Abstract interface over the catalog of a session.
pub trait CatalogStore {
    /// All books, in catalog order
    fn list_books(&self) -> Result<Vec<Book>>;

    /// Get a book by id
    fn get_book(&self, id: &BookId) -> Result<Book>;

    /// Replace an existing book as a whole, keeping its position
    fn replace_book(&mut self, book: Book) -> Result<()>;

    /// Number of books in the catalog
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
