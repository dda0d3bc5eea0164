//! # Shelf Architecture
//!
//! Shelf is a **UI-agnostic catalog library** for a personal book collection: a
//! seeded list of books that can be searched, filtered and borrowed/returned.
//! The `shelf` binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, runs the session shell, renders output │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, owns the session store        │
//! │  - Normalizes inputs (raw ids → BookId, options → Checkout) │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Filter engine, facets, borrow/return, view, config       │
//! │  - Operates on Rust types, returns CmdResult                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - CatalogStore trait, InMemoryStore seeded per session     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No Persistence
//!
//! Catalog state lives as long as the [`api::ShelfApi`] value that owns it.
//! Every session starts from a seed ([`seed`]); only configuration is read
//! from disk.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`store`]: Catalog storage abstraction and the in-memory backend
//! - [`model`]: Core data types (`Book`, `BorrowRecord`, `Condition`)
//! - [`seed`]: Built-in catalog and seed file loading
//! - [`config`]: Configuration management
//! - [`init`]: Config directory resolution and session setup
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod seed;
pub mod store;
