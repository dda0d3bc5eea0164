//! Borrow and return.
//!
//! Each transition reads the stored book, derives the next record with
//! [`Book::checked_out`] / [`Book::checked_in`] and writes it back whole.
//! A single-id call surfaces `NotFound` / `InvalidState` as an error. With
//! several ids every id is attempted; failures become error messages and the
//! successful transitions stay applied.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ShelfError};
use crate::model::{Book, BookId, Checkout};
use crate::store::CatalogStore;
use chrono::{DateTime, Utc};

pub fn borrow<S: CatalogStore>(
    store: &mut S,
    ids: &[BookId],
    checkout: &Checkout,
) -> Result<CmdResult> {
    transition(store, ids, "Borrowed", |book, now| {
        book.checked_out(checkout, now)
    })
}

pub fn return_books<S: CatalogStore>(store: &mut S, ids: &[BookId]) -> Result<CmdResult> {
    transition(store, ids, "Returned", |book, now| book.checked_in(now))
}

fn transition<S, F>(store: &mut S, ids: &[BookId], verb: &str, next: F) -> Result<CmdResult>
where
    S: CatalogStore,
    F: Fn(&Book, DateTime<Utc>) -> Result<Book>,
{
    let now = Utc::now();
    let batch = ids.len() > 1;
    let mut result = CmdResult::default();

    for id in ids {
        let updated = match store.get_book(id).and_then(|book| next(&book, now)) {
            Ok(updated) => updated,
            Err(e @ (ShelfError::NotFound(_) | ShelfError::InvalidState { .. })) if batch => {
                tracing::debug!(%id, error = %e, "skipping book");
                result.add_message(CmdMessage::error(e.to_string()));
                continue;
            }
            Err(e) => return Err(e),
        };

        store.replace_book(updated.clone())?;
        tracing::info!(%id, status = %updated.status, "book {}", verb.to_lowercase());

        let by = updated
            .current_loan()
            .map(|loan| format!(" (by {})", loan.borrower))
            .unwrap_or_default();
        result.add_message(CmdMessage::success(format!(
            "{} {}: {}{}",
            verb, updated.id, updated.title, by
        )));
        result.affected_books.push(updated);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::filter::{self, FilterCriteria};
    use crate::model::{BookStatus, Condition};
    use crate::store::memory::fixtures::{sample_catalog, StoreFixture};

    fn one(id: &str) -> Vec<BookId> {
        vec![BookId::new(id)]
    }

    #[test]
    fn borrow_marks_book_borrowed_with_open_record() {
        let mut store = sample_catalog();
        let result = borrow(&mut store, &one("1"), &Checkout::new("Current User")).unwrap();

        assert_eq!(result.affected_books.len(), 1);
        let book = store.get_book(&BookId::new("1")).unwrap();
        assert_eq!(book.status, BookStatus::Borrowed);
        assert_eq!(book.borrow_history.len(), 1);
        let record = &book.borrow_history[0];
        assert!(record.return_date.is_none());
        assert_eq!(record.borrower, "Current User");
        assert_eq!(record.condition, Condition::Good);
        assert!(result.messages[0].content.contains("Borrowed 1: Dune"));
    }

    #[test]
    fn borrow_then_return_appends_one_closed_record() {
        let mut store = sample_catalog();
        let before = store.get_book(&BookId::new("1")).unwrap();

        borrow(&mut store, &one("1"), &Checkout::new("Ada")).unwrap();
        let result = return_books(&mut store, &one("1")).unwrap();

        let after = store.get_book(&BookId::new("1")).unwrap();
        assert_eq!(after.status, BookStatus::Available);
        assert_eq!(after.borrow_history.len(), before.borrow_history.len() + 1);
        let record = after.borrow_history.last().unwrap();
        assert!(record.return_date.is_some());
        assert!(record.return_date.unwrap() >= record.borrow_date);
        assert_eq!(after.title, before.title);
        assert_eq!(result.affected_books[0], after);
    }

    #[test]
    fn borrow_already_borrowed_is_invalid_state_and_changes_nothing() {
        let mut store = StoreFixture::new()
            .with_borrowed_book("1", "Dune", "Ada")
            .build();
        let before = store.list_books().unwrap();

        let err = borrow(&mut store, &one("1"), &Checkout::new("Bob")).unwrap_err();
        assert!(matches!(err, ShelfError::InvalidState { .. }));
        assert_eq!(store.list_books().unwrap(), before);
    }

    #[test]
    fn return_available_book_is_invalid_state() {
        let mut store = sample_catalog();
        let err = return_books(&mut store, &one("2")).unwrap_err();
        assert!(matches!(err, ShelfError::InvalidState { action: "return", .. }));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut store = sample_catalog();
        let err = borrow(&mut store, &one("42"), &Checkout::new("Ada")).unwrap_err();
        assert!(matches!(err, ShelfError::NotFound(id) if id.as_str() == "42"));

        let err = return_books(&mut store, &one("42")).unwrap_err();
        assert!(matches!(err, ShelfError::NotFound(_)));
    }

    #[test]
    fn batch_applies_successes_and_reports_failures() {
        let mut store = StoreFixture::new()
            .with_books(2)
            .with_borrowed_book("3", "Out", "Ada")
            .build();
        let ids = vec![BookId::new("1"), BookId::new("3"), BookId::new("9")];

        let result = borrow(&mut store, &ids, &Checkout::new("Bob")).unwrap();

        assert_eq!(result.affected_books.len(), 1);
        assert!(result.has_errors());
        assert_eq!(
            result
                .messages
                .iter()
                .filter(|m| m.level == crate::commands::MessageLevel::Error)
                .count(),
            2
        );
        assert!(store.get_book(&BookId::new("1")).unwrap().is_borrowed());
        let still_ada = store.get_book(&BookId::new("3")).unwrap();
        assert_eq!(still_ada.current_loan().unwrap().borrower, "Ada");
    }

    #[test]
    fn checkout_condition_and_notes_are_recorded() {
        let mut store = sample_catalog();
        let checkout = Checkout::new("Ada")
            .with_condition(Condition::Poor)
            .with_notes(Some("coffee stain on cover".into()));
        borrow(&mut store, &one("2"), &checkout).unwrap();

        let book = store.get_book(&BookId::new("2")).unwrap();
        let loan = book.current_loan().unwrap();
        assert_eq!(loan.condition, Condition::Poor);
        assert_eq!(loan.notes.as_deref(), Some("coffee stain on cover"));
    }

    #[test]
    fn status_tracks_last_record_through_cycles() {
        let mut store = sample_catalog();
        for _ in 0..3 {
            borrow(&mut store, &one("1"), &Checkout::new("Ada")).unwrap();
            return_books(&mut store, &one("1")).unwrap();
        }
        borrow(&mut store, &one("1"), &Checkout::new("Bob")).unwrap();

        for book in store.list_books().unwrap() {
            let open = book
                .borrow_history
                .last()
                .is_some_and(|r| r.return_date.is_none());
            assert_eq!(book.is_borrowed(), open);
            assert!(book.validate().is_ok());
        }
        assert_eq!(
            store.get_book(&BookId::new("1")).unwrap().borrow_history.len(),
            4
        );
    }

    #[test]
    fn worked_example() {
        let mut store = sample_catalog();

        let rated = filter::run(&store, &FilterCriteria::new().with_min_rating(3.0)).unwrap();
        assert_eq!(rated.listed_books.len(), 1);
        assert_eq!(rated.listed_books[0].id, BookId::new("1"));

        borrow(&mut store, &one("1"), &Checkout::new("Current User")).unwrap();
        let book = store.get_book(&BookId::new("1")).unwrap();
        assert_eq!(book.status, BookStatus::Borrowed);
        assert_eq!(book.borrow_history.len(), 1);

        return_books(&mut store, &one("1")).unwrap();
        let book = store.get_book(&BookId::new("1")).unwrap();
        assert_eq!(book.status, BookStatus::Available);
        assert!(book.borrow_history[0].return_date.is_some());

        let tagged = filter::run(
            &store,
            &FilterCriteria::new().with_tags(["sci-fi", "history"]),
        )
        .unwrap();
        assert!(tagged.listed_books.is_empty());
    }
}
