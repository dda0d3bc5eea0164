use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::BookId;
use crate::store::CatalogStore;

use super::helpers::books_by_ids;

pub fn run<S: CatalogStore>(store: &S, ids: &[BookId]) -> Result<CmdResult> {
    let books = books_by_ids(store, ids)?;
    Ok(CmdResult::default().with_listed_books(books))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShelfError;
    use crate::store::memory::fixtures::{sample_catalog, StoreFixture};

    #[test]
    fn views_books_in_requested_order() {
        let store = sample_catalog();
        let result = run(&store, &[BookId::new("2"), BookId::new("1")]).unwrap();
        let titles: Vec<_> = result.listed_books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["SPQR", "Dune"]);
    }

    #[test]
    fn view_includes_history() {
        let store = StoreFixture::new()
            .with_borrowed_book("1", "Dune", "Ada")
            .build();
        let result = run(&store, &[BookId::new("1")]).unwrap();
        let loan = result.listed_books[0].current_loan().unwrap();
        assert_eq!(loan.borrower, "Ada");
    }

    #[test]
    fn view_unknown_is_not_found() {
        let store = sample_catalog();
        let err = run(&store, &[BookId::new("404")]).unwrap_err();
        assert!(matches!(err, ShelfError::NotFound(_)));
    }
}
