//! Document domain model.
//!
//! # Responsibility
//! - Define the stored record of one or more file attachments plus metadata.
//! - Derive attachment kind and mime type from stored paths.
//!
//! # Invariants
//! - `title` is non-blank after trim.
//! - `file_paths` is non-empty and keeps attachment order.
//! - `share_count` only grows.

use crate::model::category::CategoryId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use uuid::Uuid;

/// Stable identifier for a document.
pub type DocumentId = Uuid;

pub const MIME_IMAGE_JPEG: &str = "image/jpeg";
pub const MIME_PDF: &str = "application/pdf";

/// Validation failures for document write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentValidationError {
    /// Title is blank after trim.
    BlankTitle,
    /// No stored file is attached.
    NoFiles,
    /// An attached path is blank.
    BlankFilePath(usize),
    /// `updated_at` is earlier than `created_at`.
    InvalidTimestamps { created_at: i64, updated_at: i64 },
}

impl Display for DocumentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "document title must not be blank"),
            Self::NoFiles => write!(f, "document must have at least one attached file"),
            Self::BlankFilePath(index) => {
                write!(f, "document file path at index {index} is blank")
            }
            Self::InvalidTimestamps {
                created_at,
                updated_at,
            } => write!(
                f,
                "document updated_at ({updated_at}) must be >= created_at ({created_at})"
            ),
        }
    }
}

impl Error for DocumentValidationError {}

/// Kind of a stored attachment, detected from its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Image,
    Pdf,
}

impl AttachmentKind {
    /// Detects kind from file extension; anything other than `.pdf` is an image.
    pub fn from_path(path: &str) -> Self {
        let is_pdf = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            Self::Pdf
        } else {
            Self::Image
        }
    }
}

/// Stored document record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Stable document id.
    pub id: DocumentId,
    /// User-facing title.
    pub title: String,
    /// Owning category.
    pub category_id: CategoryId,
    /// Stored attachment paths in display order.
    pub file_paths: Vec<String>,
    /// Optional free-form memo. Blank memos are stored as `None`.
    pub memo: Option<String>,
    /// Total size of attached files.
    pub size_bytes: u64,
    pub mime_type: String,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
    /// Number of times the document was shared.
    pub share_count: u32,
}

impl Document {
    /// Creates a document with a generated id and no share history.
    pub fn new(
        title: impl Into<String>,
        category_id: CategoryId,
        file_paths: Vec<String>,
    ) -> Self {
        let mime_type = mime_type_for(&file_paths).to_string();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            category_id,
            file_paths,
            memo: None,
            size_bytes: 0,
            mime_type,
            created_at: 0,
            updated_at: 0,
            share_count: 0,
        }
    }

    /// Validates fields that must hold before persistence.
    pub fn validate(&self) -> Result<(), DocumentValidationError> {
        if self.title.trim().is_empty() {
            return Err(DocumentValidationError::BlankTitle);
        }
        if self.file_paths.is_empty() {
            return Err(DocumentValidationError::NoFiles);
        }
        if let Some(index) = self.file_paths.iter().position(|p| p.trim().is_empty()) {
            return Err(DocumentValidationError::BlankFilePath(index));
        }
        if self.created_at > 0 && self.updated_at > 0 && self.updated_at < self.created_at {
            return Err(DocumentValidationError::InvalidTimestamps {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }

    /// Kinds of each attachment, in attachment order.
    pub fn attachment_kinds(&self) -> Vec<AttachmentKind> {
        self.file_paths
            .iter()
            .map(|path| AttachmentKind::from_path(path))
            .collect()
    }

    /// Number of attached files.
    pub fn page_count(&self) -> usize {
        self.file_paths.len()
    }
}

/// Mime type for a set of attachments.
///
/// Only an all-PDF attachment list is reported as PDF.
pub fn mime_type_for(file_paths: &[String]) -> &'static str {
    let all_pdf = !file_paths.is_empty()
        && file_paths
            .iter()
            .all(|path| AttachmentKind::from_path(path) == AttachmentKind::Pdf);
    if all_pdf {
        MIME_PDF
    } else {
        MIME_IMAGE_JPEG
    }
}

/// Normalizes memo input: blank text becomes `None`.
pub fn normalize_memo(memo: Option<&str>) -> Option<String> {
    memo.filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::{mime_type_for, normalize_memo, AttachmentKind, MIME_IMAGE_JPEG, MIME_PDF};

    #[test]
    fn attachment_kind_detects_pdf_case_insensitively() {
        assert_eq!(AttachmentKind::from_path("/data/a.PDF"), AttachmentKind::Pdf);
        assert_eq!(AttachmentKind::from_path("/data/a.jpg"), AttachmentKind::Image);
        assert_eq!(AttachmentKind::from_path("/data/noext"), AttachmentKind::Image);
    }

    #[test]
    fn mime_type_is_pdf_only_when_every_file_is_pdf() {
        let pdfs = vec!["a.pdf".to_string(), "b.pdf".to_string()];
        let mixed = vec!["a.pdf".to_string(), "b.jpg".to_string()];
        assert_eq!(mime_type_for(&pdfs), MIME_PDF);
        assert_eq!(mime_type_for(&mixed), MIME_IMAGE_JPEG);
        assert_eq!(mime_type_for(&[]), MIME_IMAGE_JPEG);
    }

    #[test]
    fn blank_memo_normalizes_to_none() {
        assert_eq!(normalize_memo(Some("  ")), None);
        assert_eq!(normalize_memo(None), None);
        assert_eq!(normalize_memo(Some("renew")), Some("renew".to_string()));
    }
}
