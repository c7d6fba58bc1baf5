//! Category domain model.
//!
//! # Responsibility
//! - Define the user-defined bucket that documents are filed under.
//! - Provide write-time validation for category records.
//!
//! # Invariants
//! - `id` is stable and never reused for another category.
//! - `name` is non-blank after trim.
//! - `sort_order` is unique within the collection and non-negative.
//! - Categories flagged `is_default` cannot be deleted.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a category.
pub type CategoryId = Uuid;

/// Validation failures for category write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    /// Display name is blank after trim.
    BlankName,
    /// Ordinal is negative.
    NegativeSortOrder(i64),
}

impl Display for CategoryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "category name must not be blank"),
            Self::NegativeSortOrder(value) => {
                write!(f, "category sort_order must be >= 0, got {value}")
            }
        }
    }
}

impl Error for CategoryValidationError {}

/// User-defined named bucket with a manually controlled display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable category id.
    pub id: CategoryId,
    /// User-facing label.
    pub name: String,
    /// Display position; dense `0..count` across all categories.
    pub sort_order: i64,
    /// Seeded categories are flagged and cannot be deleted.
    pub is_default: bool,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

impl Category {
    /// Creates a user category with a generated id.
    ///
    /// Timestamps are zero until the record is persisted and read back.
    pub fn new(name: impl Into<String>, sort_order: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            sort_order,
            is_default: false,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Validates fields that must hold before persistence.
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::BlankName);
        }
        if self.sort_order < 0 {
            return Err(CategoryValidationError::NegativeSortOrder(self.sort_order));
        }
        Ok(())
    }

    /// Returns whether this category may be removed by the user.
    pub fn is_deletable(&self) -> bool {
        !self.is_default
    }
}
