//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define the CRUD contract of the category/document store.
//! - Isolate SQLite query details from services and view state.
//!
//! # Invariants
//! - Write paths validate domain records before SQL mutations.
//! - Repository APIs return semantic errors (`*NotFound`, `InvalidOrder`) in
//!   addition to DB transport errors.

use crate::db::DbError;
use crate::model::category::{CategoryId, CategoryValidationError};
use crate::model::document::{DocumentId, DocumentValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod category_repo;
pub mod document_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by category and document persistence.
#[derive(Debug)]
pub enum RepoError {
    CategoryValidation(CategoryValidationError),
    DocumentValidation(DocumentValidationError),
    Db(DbError),
    CategoryNotFound(CategoryId),
    DocumentNotFound(DocumentId),
    /// Persisted row cannot be converted to a valid domain record.
    InvalidData(String),
    /// Proposed category order is not a permutation of stored categories.
    InvalidOrder(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CategoryValidation(err) => write!(f, "{err}"),
            Self::DocumentValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::DocumentNotFound(id) => write!(f, "document not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::InvalidOrder(message) => write!(f, "invalid category order: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CategoryValidation(err) => Some(err),
            Self::DocumentValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CategoryValidationError> for RepoError {
    fn from(value: CategoryValidationError) -> Self {
        Self::CategoryValidation(value)
    }
}

impl From<DocumentValidationError> for RepoError {
    fn from(value: DocumentValidationError) -> Self {
        Self::DocumentValidation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn parse_flag(value: i64, column: &'static str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}
