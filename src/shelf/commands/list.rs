use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::CatalogStore;

pub fn run<S: CatalogStore>(store: &S) -> Result<CmdResult> {
    let books = store.list_books()?;
    Ok(CmdResult::default().with_listed_books(books))
}
