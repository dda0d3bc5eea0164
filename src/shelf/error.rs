use crate::model::{BookId, BookStatus};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShelfError {
    #[error("Book not found: {0}")]
    NotFound(BookId),

    #[error("Cannot {action} book {id}: it is {status}")]
    InvalidState {
        id: BookId,
        status: BookStatus,
        action: &'static str,
    },

    #[error("Invalid seed: {0}")]
    Seed(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, ShelfError>;
