use super::CatalogStore;
use crate::error::{Result, ShelfError};
use crate::model::{Book, BookId};
use std::collections::HashMap;

/// In-memory catalog. Does NOT persist data: a new store starts from its seed.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    books: Vec<Book>,
    positions: HashMap<BookId, usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from seed books, rejecting duplicate ids and records that
    /// break the borrow invariants.
    pub fn from_books(books: Vec<Book>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(books.len());
        for (pos, book) in books.iter().enumerate() {
            book.validate()
                .map_err(|e| ShelfError::Seed(format!("book {}: {}", book.id, e)))?;
            if positions.insert(book.id.clone(), pos).is_some() {
                return Err(ShelfError::Seed(format!("duplicate book id {}", book.id)));
            }
        }
        Ok(Self { books, positions })
    }
}

impl CatalogStore for InMemoryStore {
    fn list_books(&self) -> Result<Vec<Book>> {
        Ok(self.books.clone())
    }

    fn get_book(&self, id: &BookId) -> Result<Book> {
        self.positions
            .get(id)
            .and_then(|&pos| self.books.get(pos))
            .cloned()
            .ok_or_else(|| ShelfError::NotFound(id.clone()))
    }

    fn replace_book(&mut self, book: Book) -> Result<()> {
        let slot = self
            .positions
            .get(&book.id)
            .and_then(|&pos| self.books.get_mut(pos))
            .ok_or_else(|| ShelfError::NotFound(book.id.clone()))?;
        *slot = book;
        Ok(())
    }

    fn len(&self) -> usize {
        self.books.len()
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::Checkout;
    use chrono::Utc;

    pub struct StoreFixture {
        books: Vec<Book>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self { books: Vec::new() }
        }

        pub fn with_book(mut self, book: Book) -> Self {
            self.books.push(book);
            self
        }

        pub fn with_books(mut self, count: usize) -> Self {
            let start = self.books.len();
            for i in 0..count {
                let n = start + i + 1;
                self.books
                    .push(Book::sample(&n.to_string(), &format!("Test Book {}", n)));
            }
            self
        }

        pub fn with_borrowed_book(mut self, id: &str, title: &str, borrower: &str) -> Self {
            let book = Book::sample(id, title)
                .checked_out(&Checkout::new(borrower), Utc::now())
                .unwrap();
            self.books.push(book);
            self
        }

        pub fn build(self) -> InMemoryStore {
            InMemoryStore::from_books(self.books).unwrap()
        }
    }

    /// The two-book catalog used throughout the filter and circulation tests.
    pub fn sample_catalog() -> InMemoryStore {
        let mut dune = Book::sample("1", "Dune");
        dune.author = "Frank Herbert".to_string();
        dune.description = "Desert planet politics and giant sandworms.".to_string();
        dune.category = "Fiction".to_string();
        dune.subcategory = "Science Fiction".to_string();
        dune.rating = 4.5;
        dune.tags = vec!["sci-fi".to_string(), "classic".to_string()];

        let mut spqr = Book::sample("2", "SPQR");
        spqr.author = "Mary Beard".to_string();
        spqr.description = "A history of ancient Rome.".to_string();
        spqr.category = "Non-Fiction".to_string();
        spqr.subcategory = "History".to_string();
        spqr.language = "English".to_string();
        spqr.rating = 2.0;
        spqr.tags = vec!["history".to_string()];

        StoreFixture::new().with_book(dune).with_book(spqr).build()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;
    use crate::model::BookStatus;

    #[test]
    fn lists_in_seed_order() {
        let store = StoreFixture::new().with_books(3).build();
        let ids: Vec<_> = store
            .list_books()
            .unwrap()
            .into_iter()
            .map(|b| b.id.to_string())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn replace_keeps_position() {
        let mut store = StoreFixture::new().with_books(3).build();
        let mut book = store.get_book(&BookId::new("2")).unwrap();
        book.title = "Renamed".to_string();
        store.replace_book(book).unwrap();

        let books = store.list_books().unwrap();
        assert_eq!(books[1].title, "Renamed");
        assert_eq!(books.len(), 3);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let store = StoreFixture::new().with_books(1).build();
        let err = store.get_book(&BookId::new("99")).unwrap_err();
        assert!(matches!(err, ShelfError::NotFound(id) if id.as_str() == "99"));
    }

    #[test]
    fn replace_unknown_id_is_not_found() {
        let mut store = StoreFixture::new().with_books(1).build();
        let err = store
            .replace_book(Book::sample("99", "Ghost"))
            .unwrap_err();
        assert!(matches!(err, ShelfError::NotFound(_)));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = InMemoryStore::from_books(vec![
            Book::sample("1", "A"),
            Book::sample("1", "B"),
        ])
        .unwrap_err();
        assert!(matches!(err, ShelfError::Seed(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn rejects_inconsistent_status() {
        let mut book = Book::sample("1", "A");
        book.status = BookStatus::Borrowed;
        let err = InMemoryStore::from_books(vec![book]).unwrap_err();
        assert!(matches!(err, ShelfError::Seed(_)));
    }
}
