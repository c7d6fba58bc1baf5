//! Core domain logic for FileShare.
//! Categorized personal documents: model, local storage, and screen state.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod state;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, CategoryId, CategoryValidationError};
pub use model::document::{
    AttachmentKind, Document, DocumentId, DocumentValidationError, MIME_IMAGE_JPEG, MIME_PDF,
};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::document_repo::{DocumentRepository, SqliteDocumentRepository};
pub use repo::{RepoError, RepoResult};
pub use service::category_service::{CategoryService, CategoryServiceError};
pub use service::document_service::{DocumentService, DocumentServiceError};
pub use state::category_order::{CategoryOrderError, CategoryOrderStore};
pub use state::document_draft::{DocumentDraft, DraftNotReady};
pub use state::document_query::{filter_documents, DocumentQuery, DocumentQueryView};
pub use state::selection::SelectionState;
pub use state::signal::{Signal, SubscriptionId};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
