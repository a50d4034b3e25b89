//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`Validation`] thrown when submitted fields are missing or empty.
//! - [`KeyNotFound`] thrown when an id does not resolve to any record.
//! - [`Forbidden`] thrown when a record belongs to another user.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Forbidden`]: EngineError::Forbidden
use sea_orm::DbErr;
use thiserror::Error;

use crate::validation::FieldViolation;

fn field_list(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|violation| violation.field)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid fields: {}", field_list(.0))]
    Validation(Vec<FieldViolation>),
    #[error("{0} not found")]
    KeyNotFound(String),
    /// The record exists but is owned by someone else. The payload is for
    /// logs only and is never shown to the caller.
    #[error("not authorised")]
    Forbidden(String),
    #[error("{0} already exists")]
    ExistingKey(String),
    #[error("Invalid Credentials")]
    InvalidCredentials,
    #[error("hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::Hashing(a), Self::Hashing(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
