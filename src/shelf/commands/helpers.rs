use crate::error::{Result, ShelfError};
use crate::model::{Book, BookId};
use crate::store::CatalogStore;

/// Turns raw user input into book ids, dropping repeats while keeping the
/// first-seen order.
pub fn parse_ids<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<BookId>> {
    if inputs.is_empty() {
        return Err(ShelfError::Api("At least one book id is required".into()));
    }

    let mut ids: Vec<BookId> = Vec::with_capacity(inputs.len());
    for raw in inputs {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ShelfError::Api("Book id cannot be empty".into()));
        }
        let id = BookId::new(trimmed);
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

pub fn books_by_ids<S: CatalogStore>(store: &S, ids: &[BookId]) -> Result<Vec<Book>> {
    ids.iter().map(|id| store.get_book(id)).collect()
}
