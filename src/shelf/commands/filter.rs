//! # Filter Engine
//!
//! Derives the visible subset of the catalog from a set of criteria. The
//! projection is pure: the same catalog and criteria always produce the same
//! books, in catalog order, and the store is only read.
//!
//! ## Matching
//!
//! A book is included iff every criterion group passes:
//!
//! | Group         | Passes when                                                   |
//! |---------------|---------------------------------------------------------------|
//! | `query`       | case-insensitive substring of title OR author OR description  |
//! | `category`    | unset, or equal to the book's category                        |
//! | `subcategory` | unset, or equal to the book's subcategory                     |
//! | `language`    | unset, or equal to the book's language                        |
//! | `min_rating`  | `book.rating >= min_rating`                                   |
//! | `tags`        | every required tag is on the book (empty set passes)          |

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Book;
use crate::store::CatalogStore;

pub const NO_MATCHES: &str = "No books found matching your criteria.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub query: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub language: Option<String>,
    pub min_rating: f64,
    /// Required tags, in the order they were selected. No duplicates.
    pub tags: Vec<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = min_rating;
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        for tag in tags {
            let tag = tag.into();
            if !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        self
    }

    /// Selects the tag if it is not required yet, otherwise deselects it.
    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
        } else {
            self.tags.push(tag.to_string());
        }
    }

    /// True when the criteria let every book through.
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
            && self.category.is_none()
            && self.subcategory.is_none()
            && self.language.is_none()
            && self.min_rating <= 0.0
            && self.tags.is_empty()
    }

    pub fn matches(&self, book: &Book) -> bool {
        self.matches_query(book)
            && matches_exact(self.category.as_deref(), &book.category)
            && matches_exact(self.subcategory.as_deref(), &book.subcategory)
            && matches_exact(self.language.as_deref(), &book.language)
            && self.matches_rating(book)
            && self.matches_tags(book)
    }

    pub fn matches_query(&self, book: &Book) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        [&book.title, &book.author, &book.description]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn matches_rating(&self, book: &Book) -> bool {
        book.rating >= self.min_rating
    }

    pub fn matches_tags(&self, book: &Book) -> bool {
        self.tags.iter().all(|tag| book.has_tag(tag))
    }
}

fn matches_exact(wanted: Option<&str>, actual: &str) -> bool {
    wanted.map_or(true, |w| w == actual)
}

/// Books of `books` matching `criteria`, in their original order.
pub fn apply(books: Vec<Book>, criteria: &FilterCriteria) -> Vec<Book> {
    books.into_iter().filter(|b| criteria.matches(b)).collect()
}

pub fn run<S: CatalogStore>(store: &S, criteria: &FilterCriteria) -> Result<CmdResult> {
    let books = store.list_books()?;
    let total = books.len();
    let matched = apply(books, criteria);
    tracing::debug!(total, matched = matched.len(), ?criteria, "filtered catalog");

    let mut result = CmdResult::default();
    if matched.is_empty() {
        result.add_message(CmdMessage::info(NO_MATCHES));
    }
    Ok(result.with_listed_books(matched))
}
