//! Category management use-cases.
//!
//! # Responsibility
//! - Normalize names and enforce delete rules above the repository.
//!
//! # Invariants
//! - Names are trimmed and non-blank.
//! - Default categories are never deleted.
//! - Categories that still file documents are never deleted.

use crate::model::category::{Category, CategoryId, CategoryValidationError};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from category service operations.
#[derive(Debug)]
pub enum CategoryServiceError {
    /// Name is blank after trim.
    InvalidName,
    CategoryNotFound(CategoryId),
    /// Seeded categories are protected.
    DefaultCategory(CategoryId),
    /// Category still has documents filed under it.
    CategoryInUse {
        category_id: CategoryId,
        document_count: u64,
    },
    Repo(RepoError),
}

impl Display for CategoryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "category name must not be blank"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::DefaultCategory(id) => write!(f, "default category cannot be deleted: {id}"),
            Self::CategoryInUse {
                category_id,
                document_count,
            } => write!(
                f,
                "category {category_id} still has {document_count} document(s)"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CategoryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CategoryServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::CategoryNotFound(id) => Self::CategoryNotFound(id),
            RepoError::CategoryValidation(CategoryValidationError::BlankName) => Self::InvalidName,
            other => Self::Repo(other),
        }
    }
}

/// Category service facade.
pub struct CategoryService<R: CategoryRepository> {
    repo: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Categories in display order.
    pub fn list_categories(&self) -> Result<Vec<Category>, CategoryServiceError> {
        self.repo.list_categories().map_err(Into::into)
    }

    /// Adds a user category at the end of the order.
    pub fn add_category(&self, name: impl Into<String>) -> Result<Category, CategoryServiceError> {
        let normalized = normalize_name(name.into())?;
        let category = self.repo.create_category(normalized.as_str())?;
        info!(
            "event=category_add module=service status=ok sort_order={}",
            category.sort_order
        );
        Ok(category)
    }

    pub fn rename_category(
        &self,
        id: CategoryId,
        name: impl Into<String>,
    ) -> Result<(), CategoryServiceError> {
        let normalized = normalize_name(name.into())?;
        self.repo
            .rename_category(id, normalized.as_str())
            .map_err(Into::into)
    }

    /// Deletes a user category that has no documents.
    pub fn delete_category(&self, id: CategoryId) -> Result<(), CategoryServiceError> {
        let category = self
            .repo
            .get_category(id)?
            .ok_or(CategoryServiceError::CategoryNotFound(id))?;
        if !category.is_deletable() {
            warn!("event=category_delete module=service status=rejected reason=default");
            return Err(CategoryServiceError::DefaultCategory(id));
        }

        let document_count = self.repo.count_documents(id)?;
        if document_count > 0 {
            warn!(
                "event=category_delete module=service status=rejected reason=in_use document_count={document_count}"
            );
            return Err(CategoryServiceError::CategoryInUse {
                category_id: id,
                document_count,
            });
        }

        self.repo.delete_category(id)?;
        info!("event=category_delete module=service status=ok");
        Ok(())
    }
}

fn normalize_name(value: String) -> Result<String, CategoryServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CategoryServiceError::InvalidName);
    }
    Ok(trimmed.to_string())
}
