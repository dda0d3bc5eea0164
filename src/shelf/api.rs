//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every shelf operation, whichever UI drives it.
//!
//! The facade:
//! - **Dispatches** to the matching command function
//! - **Normalizes inputs** (raw id strings → [`BookId`]s, borrow options →
//!   a [`Checkout`] filled from configuration)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no printing and holds no presentation logic.
//!
//! ## Ownership
//!
//! `ShelfApi<S: CatalogStore>` owns its store. One value is one session:
//! construct it from a seed, drive it, drop it. Mutations take `&mut self`,
//! so writers are serialized by the borrow checker.

use crate::commands;
use crate::config::ShelfConfig;
use crate::error::Result;
use crate::model::{Checkout, Condition};
use crate::store::CatalogStore;
use std::path::{Path, PathBuf};

pub use crate::commands::config::ConfigAction;
pub use crate::commands::{CmdMessage, CmdResult, Facets, FilterCriteria, MessageLevel};

/// Per-call overrides for a borrow. Unset fields fall back to configuration.
#[derive(Debug, Clone, Default)]
pub struct BorrowOptions {
    pub borrower: Option<String>,
    pub condition: Option<Condition>,
    pub notes: Option<String>,
}

pub struct ShelfApi<S: CatalogStore> {
    store: S,
    config_dir: PathBuf,
    config: ShelfConfig,
}

impl<S: CatalogStore> ShelfApi<S> {
    pub fn new(store: S, config_dir: PathBuf, config: ShelfConfig) -> Self {
        Self {
            store,
            config_dir,
            config,
        }
    }

    pub fn list_all(&self) -> Result<CmdResult> {
        commands::list::run(&self.store)
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> Result<CmdResult> {
        commands::filter::run(&self.store, criteria)
    }

    pub fn facets(&self) -> Result<CmdResult> {
        commands::facets::run(&self.store)
    }

    pub fn view<I: AsRef<str>>(&self, ids: &[I]) -> Result<CmdResult> {
        let ids = commands::helpers::parse_ids(ids)?;
        commands::view::run(&self.store, &ids)
    }

    pub fn borrow<I: AsRef<str>>(
        &mut self,
        ids: &[I],
        options: BorrowOptions,
    ) -> Result<CmdResult> {
        let ids = commands::helpers::parse_ids(ids)?;
        let checkout = self.checkout_for(options);
        commands::circulation::borrow(&mut self.store, &ids, &checkout)
    }

    pub fn return_books<I: AsRef<str>>(&mut self, ids: &[I]) -> Result<CmdResult> {
        let ids = commands::helpers::parse_ids(ids)?;
        commands::circulation::return_books(&mut self.store, &ids)
    }

    /// Runs a config action. A successful `Set` also updates the defaults used
    /// by later borrows in this session.
    pub fn config(&mut self, action: ConfigAction) -> Result<CmdResult> {
        let result = commands::config::run(&self.config_dir, action)?;
        if let Some(updated) = &result.config {
            self.config = updated.clone();
        }
        Ok(result)
    }

    pub fn settings(&self) -> &ShelfConfig {
        &self.config
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn checkout_for(&self, options: BorrowOptions) -> Checkout {
        let borrower = options
            .borrower
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| self.config.borrower.clone());
        Checkout::new(borrower)
            .with_condition(options.condition.unwrap_or(self.config.condition))
            .with_notes(options.notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShelfError;
    use crate::model::BookId;
    use crate::store::memory::fixtures::sample_catalog;
    use crate::store::memory::InMemoryStore;
    use tempfile::{tempdir, TempDir};

    fn api() -> (ShelfApi<InMemoryStore>, TempDir) {
        let temp = tempdir().unwrap();
        let api = ShelfApi::new(
            sample_catalog(),
            temp.path().to_path_buf(),
            ShelfConfig::default(),
        );
        (api, temp)
    }

    #[test]
    fn borrow_uses_configured_defaults() {
        let (mut api, _temp) = api();
        let result = api.borrow(&["1"], BorrowOptions::default()).unwrap();

        let loan = result.affected_books[0].current_loan().unwrap();
        assert_eq!(loan.borrower, "Current User");
        assert_eq!(loan.condition, Condition::Good);
        assert!(loan.notes.is_none());
    }

    #[test]
    fn borrow_options_override_defaults() {
        let (mut api, _temp) = api();
        let options = BorrowOptions {
            borrower: Some("Ada".into()),
            condition: Some(Condition::Excellent),
            notes: Some("signed copy".into()),
        };
        let result = api.borrow(&["1"], options).unwrap();

        let loan = result.affected_books[0].current_loan().unwrap();
        assert_eq!(loan.borrower, "Ada");
        assert_eq!(loan.condition, Condition::Excellent);
        assert_eq!(loan.notes.as_deref(), Some("signed copy"));
    }

    #[test]
    fn blank_borrower_falls_back_to_config() {
        let (mut api, _temp) = api();
        let options = BorrowOptions {
            borrower: Some("  ".into()),
            ..Default::default()
        };
        let result = api.borrow(&["1"], options).unwrap();
        assert_eq!(
            result.affected_books[0].current_loan().unwrap().borrower,
            "Current User"
        );
    }

    #[test]
    fn config_set_updates_session_defaults() {
        let (mut api, _temp) = api();
        api.config(ConfigAction::Set("borrower".into(), "Grace".into()))
            .unwrap();
        assert_eq!(api.settings().borrower, "Grace");

        let result = api.borrow(&["2"], BorrowOptions::default()).unwrap();
        assert_eq!(
            result.affected_books[0].current_loan().unwrap().borrower,
            "Grace"
        );
    }

    #[test]
    fn return_dispatches_to_circulation() {
        let (mut api, _temp) = api();
        api.borrow(&["1"], BorrowOptions::default()).unwrap();
        let result = api.return_books(&["1"]).unwrap();
        assert!(!result.affected_books[0].is_borrowed());
    }

    #[test]
    fn view_parses_ids() {
        let (api, _temp) = api();
        let result = api.view(&[" 2 "]).unwrap();
        assert_eq!(result.listed_books[0].id, BookId::new("2"));

        let err = api.view(&["nope"]).unwrap_err();
        assert!(matches!(err, ShelfError::NotFound(_)));
    }

    #[test]
    fn filter_and_facets_do_not_touch_store() {
        let (api, _temp) = api();
        let before = api.store().list_books().unwrap();
        api.filter(&FilterCriteria::new().with_query("history")).unwrap();
        api.facets().unwrap();
        assert_eq!(api.store().list_books().unwrap(), before);
    }

    #[test]
    fn list_all_returns_catalog() {
        let (api, _temp) = api();
        assert_eq!(api.list_all().unwrap().listed_books.len(), 2);
    }
}
