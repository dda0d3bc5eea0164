use crate::error::{Result, ShelfError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

/// Stable identifier of a book within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BookId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Available,
    Borrowed,
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookStatus::Available => f.write_str("available"),
            BookStatus::Borrowed => f.write_str("borrowed"),
        }
    }
}

/// Physical condition of a copy, recorded at checkout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
}

impl Condition {
    pub fn all() -> &'static [Condition] {
        &[
            Condition::Excellent,
            Condition::Good,
            Condition::Fair,
            Condition::Poor,
        ]
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Condition::Excellent => "excellent",
            Condition::Good => "good",
            Condition::Fair => "fair",
            Condition::Poor => "poor",
        };
        f.write_str(s)
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Condition::all()
            .iter()
            .copied()
            .find(|c| c.to_string() == wanted)
            .ok_or_else(|| {
                let names: Vec<String> = Condition::all().iter().map(|c| c.to_string()).collect();
                format!(
                    "Invalid condition '{}'. Expected one of: {}",
                    wanted,
                    names.join(", ")
                )
            })
    }
}

/// One checkout/return cycle of a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecord {
    pub borrow_date: DateTime<Utc>,
    #[serde(default)]
    pub return_date: Option<DateTime<Utc>>,
    pub borrower: String,
    pub condition: Condition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl BorrowRecord {
    pub fn is_outstanding(&self) -> bool {
        self.return_date.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub cover: String,
    pub category: String,
    pub subcategory: String,
    pub isbn: String,
    pub published_year: i32,
    pub publisher: String,
    pub description: String,
    pub pages: u32,
    pub language: String,
    pub rating: f64,
    pub status: BookStatus,
    pub location: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub borrow_history: Vec<BorrowRecord>,
}

/// Who is borrowing a book and in what shape it leaves the shelf.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkout {
    pub borrower: String,
    pub condition: Condition,
    pub notes: Option<String>,
}

impl Checkout {
    pub fn new(borrower: impl Into<String>) -> Self {
        Self {
            borrower: borrower.into(),
            condition: Condition::default(),
            notes: None,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes.filter(|n| !n.trim().is_empty());
        self
    }
}

impl Book {
    pub fn is_borrowed(&self) -> bool {
        self.status == BookStatus::Borrowed
    }

    /// The open borrow record, if the book is out.
    pub fn current_loan(&self) -> Option<&BorrowRecord> {
        self.borrow_history.last().filter(|r| r.is_outstanding())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Returns a copy of this book checked out to `checkout.borrower`.
    ///
    /// The receiver is left untouched; callers replace the stored record with
    /// the returned one.
    pub fn checked_out(&self, checkout: &Checkout, now: DateTime<Utc>) -> Result<Book> {
        if self.is_borrowed() {
            return Err(ShelfError::InvalidState {
                id: self.id.clone(),
                status: self.status,
                action: "borrow",
            });
        }

        let mut next = self.clone();
        next.status = BookStatus::Borrowed;
        next.borrow_history.push(BorrowRecord {
            borrow_date: now,
            return_date: None,
            borrower: checkout.borrower.clone(),
            condition: checkout.condition,
            notes: checkout.notes.clone(),
        });
        Ok(next)
    }

    /// Returns a copy of this book with its open loan closed at `now`.
    pub fn checked_in(&self, now: DateTime<Utc>) -> Result<Book> {
        if !self.is_borrowed() {
            return Err(ShelfError::InvalidState {
                id: self.id.clone(),
                status: self.status,
                action: "return",
            });
        }

        let mut next = self.clone();
        next.status = BookStatus::Available;
        match next.borrow_history.last_mut() {
            Some(record) if record.is_outstanding() => record.return_date = Some(now),
            _ => {
                return Err(ShelfError::Seed(format!(
                    "book {} is marked borrowed but has no open borrow record",
                    self.id
                )))
            }
        }
        Ok(next)
    }

    /// Checks the record-level invariants: rating range, a single open loan
    /// in last position, and status agreeing with the history.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.rating.is_finite() || self.rating < MIN_RATING || self.rating > MAX_RATING {
            return Err(format!(
                "rating {} is outside [{}, {}]",
                self.rating, MIN_RATING, MAX_RATING
            ));
        }

        let last = self.borrow_history.len().saturating_sub(1);
        for (i, record) in self.borrow_history.iter().enumerate() {
            if record.is_outstanding() && i != last {
                return Err(format!(
                    "borrow record {} is still open but is not the most recent",
                    i + 1
                ));
            }
            if let Some(returned) = record.return_date {
                if returned < record.borrow_date {
                    return Err(format!(
                        "borrow record {} was returned before it was borrowed",
                        i + 1
                    ));
                }
            }
        }

        let open = self
            .borrow_history
            .last()
            .is_some_and(BorrowRecord::is_outstanding);
        match (self.status, open) {
            (BookStatus::Borrowed, false) => {
                Err("status is borrowed but there is no open borrow record".to_string())
            }
            (BookStatus::Available, true) => {
                Err("status is available but the last borrow record is open".to_string())
            }
            _ => Ok(()),
        }
    }
}

#[cfg(any(test, feature = "test_utils"))]
impl Book {
    /// Minimal book for tests; descriptive fields are derived from `id` and `title`.
    pub fn sample(id: &str, title: &str) -> Self {
        Self {
            id: BookId::new(id),
            title: title.to_string(),
            author: "Unknown Author".to_string(),
            cover: String::new(),
            category: "Fiction".to_string(),
            subcategory: "Novel".to_string(),
            isbn: format!("000-{}", id),
            published_year: 2000,
            publisher: "Test Press".to_string(),
            description: String::new(),
            pages: 100,
            language: "English".to_string(),
            rating: 3.0,
            status: BookStatus::Available,
            location: "Shelf A".to_string(),
            tags: Vec::new(),
            borrow_history: Vec::new(),
        }
    }
}
