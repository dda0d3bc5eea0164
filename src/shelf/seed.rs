//! Seed catalogs.
//!
//! A session starts from a fixed list of books: the catalog compiled into the
//! binary, or a JSON file with the same shape. Loading checks the shape and
//! the borrow invariants (see [`Book::validate`](crate::model::Book::validate));
//! nothing is written back.

use crate::error::{Result, ShelfError};
use crate::model::Book;
use crate::store::memory::InMemoryStore;
use crate::store::CatalogStore;
use std::fs;
use std::path::Path;

pub const BUILTIN_SEED: &str = include_str!("seed/books.json");

pub fn parse(json: &str) -> Result<Vec<Book>> {
    serde_json::from_str(json).map_err(|e| ShelfError::Seed(e.to_string()))
}

/// Builds the session store from `path`, or from the built-in catalog.
pub fn load(path: Option<&Path>) -> Result<InMemoryStore> {
    let books = match path {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|e| {
                ShelfError::Seed(format!("cannot read {}: {}", path.display(), e))
            })?;
            parse(&json).map_err(|e| match e {
                ShelfError::Seed(msg) => ShelfError::Seed(format!("{}: {}", path.display(), msg)),
                other => other,
            })?
        }
        None => parse(BUILTIN_SEED)?,
    };

    let store = InMemoryStore::from_books(books)?;
    tracing::debug!(
        books = store.len(),
        source = %path.map(|p| p.display().to_string()).unwrap_or_else(|| "built-in".into()),
        "seeded catalog"
    );
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BookStatus;
    use tempfile::tempdir;

    #[test]
    fn builtin_seed_is_valid() {
        let store = load(None).unwrap();
        let books = store.list_books().unwrap();
        assert!(books.len() >= 8);
        assert!(books.iter().any(|b| b.status == BookStatus::Borrowed));
        assert!(books.iter().any(|b| b.status == BookStatus::Available));
    }

    #[test]
    fn loads_seed_from_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("books.json");
        let book = Book::sample("x1", "Only Book");
        fs::write(&path, serde_json::to_string(&vec![book]).unwrap()).unwrap();

        let store = load(Some(&path)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.list_books().unwrap()[0].title, "Only Book");
    }

    #[test]
    fn malformed_seed_names_the_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("broken.json");
        fs::write(&path, "[{\"id\": 1}]").unwrap();

        let err = load(Some(&path)).unwrap_err();
        assert!(matches!(err, ShelfError::Seed(msg) if msg.contains("broken.json")));
    }

    #[test]
    fn missing_seed_file_is_seed_error() {
        let temp = tempdir().unwrap();
        let err = load(Some(&temp.path().join("absent.json"))).unwrap_err();
        assert!(matches!(err, ShelfError::Seed(_)));
    }
}
