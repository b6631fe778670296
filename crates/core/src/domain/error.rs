// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Title normalizes to an empty slug: {0:?}")]
    EmptySlug(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown counter: {0}")]
    UnknownCounter(String),

    #[error("Unknown event kind: {0}")]
    UnknownEventKind(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
