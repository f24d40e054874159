//! The module contains the errors the engine can throw.
//!
//! The variants mirror the failure taxonomy of the HTTP surface:
//!
//! - [`Validation`] rejected before any storage access.
//! - [`KeyNotFound`] thrown when a referenced record is absent.
//! - [`Forbidden`] thrown when a record exists but belongs to another user.
//! - [`DuplicateCategory`] thrown when attaching a category twice.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`DuplicateCategory`]: EngineError::DuplicateCategory
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Not authorized: {0}")]
    Forbidden(String),
    #[error("Category already added: {0}")]
    DuplicateCategory(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::DuplicateCategory(a), Self::DuplicateCategory(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
