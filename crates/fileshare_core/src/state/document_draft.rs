//! Add/edit form state for one document.
//!
//! # Responsibility
//! - Hold unsaved title, category, memo and attachment list.
//! - Decide whether the form is ready to save.
//!
//! # Invariants
//! - Not-ready is a value, never a failure: the UI disables save instead.
//! - Attachment order is the order files were added.

use crate::model::category::{Category, CategoryId};
use crate::model::document::{Document, DocumentId};
use std::fmt::{Display, Formatter};

/// First reason a draft cannot be saved yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftNotReady {
    BlankTitle,
    NoCategory,
    NoFiles,
}

impl Display for DraftNotReady {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "title is required"),
            Self::NoCategory => write!(f, "category is required"),
            Self::NoFiles => write!(f, "at least one file is required"),
        }
    }
}

/// Unsaved document form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentDraft {
    /// `Some` in edit mode.
    pub document_id: Option<DocumentId>,
    pub title: String,
    pub category_id: Option<CategoryId>,
    pub memo: String,
    pub file_paths: Vec<String>,
}

impl DocumentDraft {
    /// Empty draft for a new document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Edit-mode draft prefilled from a stored document.
    pub fn from_document(document: &Document) -> Self {
        Self {
            document_id: Some(document.id),
            title: document.title.clone(),
            category_id: Some(document.category_id),
            memo: document.memo.clone().unwrap_or_default(),
            file_paths: document.file_paths.clone(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.document_id.is_some()
    }

    /// Picks the first category when none is chosen yet.
    pub fn apply_default_category(&mut self, categories: &[Category]) {
        if self.category_id.is_none() {
            self.category_id = categories.first().map(|category| category.id);
        }
    }

    pub fn add_file(&mut self, path: impl Into<String>) {
        self.file_paths.push(path.into());
    }

    /// Removes the attachment at `index`; returns it when present.
    pub fn remove_file(&mut self, index: usize) -> Option<String> {
        (index < self.file_paths.len()).then(|| self.file_paths.remove(index))
    }

    pub fn readiness(&self) -> Result<(), DraftNotReady> {
        if self.title.trim().is_empty() {
            return Err(DraftNotReady::BlankTitle);
        }
        if self.category_id.is_none() {
            return Err(DraftNotReady::NoCategory);
        }
        if self.file_paths.is_empty() {
            return Err(DraftNotReady::NoFiles);
        }
        Ok(())
    }

    pub fn is_ready_to_save(&self) -> bool {
        self.readiness().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentDraft, DraftNotReady};
    use crate::model::category::Category;
    use crate::model::document::Document;

    #[test]
    fn readiness_reports_first_missing_piece() {
        let mut draft = DocumentDraft::new();
        assert_eq!(draft.readiness(), Err(DraftNotReady::BlankTitle));

        draft.title = "  Passport ".to_string();
        assert_eq!(draft.readiness(), Err(DraftNotReady::NoCategory));

        draft.apply_default_category(&[Category::new("Identity", 0), Category::new("Other", 1)]);
        assert_eq!(draft.readiness(), Err(DraftNotReady::NoFiles));

        draft.add_file("/files/passport.jpg");
        assert!(draft.is_ready_to_save());
    }

    #[test]
    fn default_category_does_not_override_choice() {
        let chosen = Category::new("Finance", 1);
        let mut draft = DocumentDraft {
            category_id: Some(chosen.id),
            ..DocumentDraft::default()
        };
        draft.apply_default_category(&[Category::new("Identity", 0)]);
        assert_eq!(draft.category_id, Some(chosen.id));
    }

    #[test]
    fn edit_draft_round_trips_stored_fields() {
        let category = Category::new("Identity", 0);
        let mut document = Document::new("Passport", category.id, vec!["/a.jpg".to_string()]);
        document.memo = Some("renew 2025".to_string());

        let draft = DocumentDraft::from_document(&document);
        assert!(draft.is_edit());
        assert_eq!(draft.memo, "renew 2025");
        assert_eq!(draft.file_paths, vec!["/a.jpg".to_string()]);
    }

    #[test]
    fn remove_file_ignores_out_of_range_index() {
        let mut draft = DocumentDraft::new();
        draft.add_file("/a.jpg");
        draft.add_file("/b.pdf");

        assert_eq!(draft.remove_file(5), None);
        assert_eq!(draft.remove_file(0), Some("/a.jpg".to_string()));
        assert_eq!(draft.file_paths, vec!["/b.pdf".to_string()]);
    }
}
