//! Document use-cases for list, detail and add/edit screens.
//!
//! # Responsibility
//! - Turn a ready [`DocumentDraft`] into a stored document.
//! - Derive size and mime type from attachments.
//! - Count shares.
//!
//! # Invariants
//! - Saving an unready draft never reaches the repository.
//! - Editing keeps `created_at` and `share_count`.
//! - Titles are stored trimmed; blank memos are stored as absent.

use crate::model::category::CategoryId;
use crate::model::document::{mime_type_for, normalize_memo, Document, DocumentId};
use crate::repo::document_repo::DocumentRepository;
use crate::repo::RepoError;
use crate::state::document_draft::{DocumentDraft, DraftNotReady};
use crate::state::document_query::{filter_documents, DocumentQuery};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Errors from document service operations.
#[derive(Debug)]
pub enum DocumentServiceError {
    /// Draft is missing a title, category, or file.
    NotReady(DraftNotReady),
    CategoryNotFound(CategoryId),
    DocumentNotFound(DocumentId),
    Repo(RepoError),
    /// Write succeeded but read-back did not find the row.
    InconsistentState(&'static str),
}

impl Display for DocumentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotReady(reason) => write!(f, "document is not ready to save: {reason}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::DocumentNotFound(id) => write!(f, "document not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent document state: {details}")
            }
        }
    }
}

impl Error for DocumentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for DocumentServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DocumentNotFound(id) => Self::DocumentNotFound(id),
            RepoError::CategoryNotFound(id) => Self::CategoryNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Document service facade.
pub struct DocumentService<R: DocumentRepository> {
    repo: R,
}

impl<R: DocumentRepository> DocumentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// All documents, most recently updated first.
    pub fn list_documents(&self) -> Result<Vec<Document>, DocumentServiceError> {
        self.repo.list_documents().map_err(Into::into)
    }

    /// Documents passing `query`, in list order.
    pub fn query_documents(
        &self,
        query: &DocumentQuery,
    ) -> Result<Vec<Document>, DocumentServiceError> {
        let documents = self.repo.list_documents()?;
        Ok(filter_documents(&documents, query))
    }

    pub fn get_document(&self, id: DocumentId) -> Result<Option<Document>, DocumentServiceError> {
        self.repo.get_document(id).map_err(Into::into)
    }

    /// Creates or updates a document from form state.
    pub fn save_draft(&self, draft: &DocumentDraft) -> Result<Document, DocumentServiceError> {
        draft.readiness().map_err(DocumentServiceError::NotReady)?;
        let Some(category_id) = draft.category_id else {
            return Err(DocumentServiceError::NotReady(DraftNotReady::NoCategory));
        };
        if !self.repo.category_exists(category_id)? {
            return Err(DocumentServiceError::CategoryNotFound(category_id));
        }

        let title = draft.title.trim().to_string();
        let memo = normalize_memo(Some(draft.memo.as_str()));
        let size_bytes = attachment_size_bytes(&draft.file_paths);
        let mime_type = mime_type_for(&draft.file_paths).to_string();

        let id = match draft.document_id {
            Some(id) => {
                let mut document = self
                    .repo
                    .get_document(id)?
                    .ok_or(DocumentServiceError::DocumentNotFound(id))?;
                document.title = title;
                document.category_id = category_id;
                document.file_paths = draft.file_paths.clone();
                document.memo = memo;
                document.size_bytes = size_bytes;
                document.mime_type = mime_type;
                self.repo.update_document(&document)?;
                info!(
                    "event=document_save module=service status=ok mode=update file_count={} size_bytes={size_bytes}",
                    document.file_paths.len()
                );
                id
            }
            None => {
                let mut document = Document::new(title, category_id, draft.file_paths.clone());
                document.memo = memo;
                document.size_bytes = size_bytes;
                document.mime_type = mime_type;
                let id = self.repo.create_document(&document)?;
                info!(
                    "event=document_save module=service status=ok mode=create file_count={} size_bytes={size_bytes}",
                    document.file_paths.len()
                );
                id
            }
        };

        self.repo
            .get_document(id)?
            .ok_or(DocumentServiceError::InconsistentState(
                "saved document not found in read-back",
            ))
    }

    pub fn delete_document(&self, id: DocumentId) -> Result<(), DocumentServiceError> {
        self.repo.delete_document(id)?;
        info!("event=document_delete module=service status=ok");
        Ok(())
    }

    /// Records one share of `id` and returns the updated document.
    pub fn record_share(&self, id: DocumentId) -> Result<Document, DocumentServiceError> {
        self.repo.increment_share_count(id)?;
        let document = self
            .repo
            .get_document(id)?
            .ok_or(DocumentServiceError::DocumentNotFound(id))?;
        info!(
            "event=document_share module=service status=ok share_count={} file_count={}",
            document.share_count,
            document.file_paths.len()
        );
        Ok(document)
    }
}

/// Sums on-disk sizes of `paths`; unreadable files count as zero.
pub fn attachment_size_bytes(paths: &[String]) -> u64 {
    paths
        .iter()
        .map(|path| {
            std::fs::metadata(Path::new(path))
                .map(|metadata| metadata.len())
                .unwrap_or(0)
        })
        .sum()
}
