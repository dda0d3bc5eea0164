use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::Book;
use crate::store::CatalogStore;
use serde::Serialize;
use std::collections::HashSet;

/// Distinct values of the filterable fields, used to populate filter choices.
///
/// Each list is unique and in first-seen catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub categories: Vec<String>,
    pub subcategories: Vec<String>,
    pub languages: Vec<String>,
    pub tags: Vec<String>,
}

impl Facets {
    pub fn from_books(books: &[Book]) -> Self {
        Self {
            categories: distinct(books.iter().map(|b| b.category.as_str())),
            subcategories: distinct(books.iter().map(|b| b.subcategory.as_str())),
            languages: distinct(books.iter().map(|b| b.language.as_str())),
            tags: distinct(books.iter().flat_map(|b| b.tags.iter().map(String::as_str))),
        }
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

pub fn run<S: CatalogStore>(store: &S) -> Result<CmdResult> {
    let books = store.list_books()?;
    Ok(CmdResult::default().with_facets(Facets::from_books(&books)))
}
