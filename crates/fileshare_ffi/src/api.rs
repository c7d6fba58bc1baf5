//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose category and document use-cases to Dart via FRB.
//! - Flatten core errors into `ok=false` envelopes with messages.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Ids cross the boundary as UUID strings.

use fileshare_core::db::open_db;
use fileshare_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Category, CategoryOrderStore, CategoryService, Document, DocumentDraft, DocumentQuery,
    DocumentService, SqliteCategoryRepository, SqliteDocumentRepository,
};
use log::warn;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const DB_FILE_NAME: &str = "fileshare_core.sqlite3";
const DB_PATH_ENV: &str = "FILESHARE_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and an error message on failure.
/// Safe to call repeatedly with the same `level + log_dir`.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Category row for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryItem {
    pub id: String,
    pub name: String,
    pub sort_order: i64,
    /// Default categories render a disabled delete control.
    pub is_default: bool,
}

/// Ordered category list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryListResponse {
    pub ok: bool,
    pub items: Vec<CategoryItem>,
    pub message: String,
}

/// Document row for list and detail rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentItem {
    pub id: String,
    pub title: String,
    pub category_id: String,
    pub file_paths: Vec<String>,
    pub memo: Option<String>,
    pub size_bytes: u64,
    pub mime_type: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub share_count: u32,
}

/// Filtered document list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentListResponse {
    pub ok: bool,
    pub items: Vec<DocumentItem>,
    pub message: String,
}

/// Single document envelope; `item` is `None` when not found or on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDetailResponse {
    pub ok: bool,
    pub item: Option<DocumentItem>,
    pub message: String,
}

/// Generic write envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Id of the created or affected record.
    pub id: Option<String>,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Lists categories in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn category_list() -> CategoryListResponse {
    let result = with_connection(|conn| {
        let repo = SqliteCategoryRepository::try_new(conn).map_err(|err| err.to_string())?;
        CategoryService::new(repo)
            .list_categories()
            .map_err(|err| err.to_string())
    });
    category_list_response("category_list", result)
}

/// Adds a category at the end of the order.
#[flutter_rust_bridge::frb(sync)]
pub fn category_add(name: String) -> ActionResponse {
    let result = with_connection(|conn| {
        let repo = SqliteCategoryRepository::try_new(conn).map_err(|err| err.to_string())?;
        CategoryService::new(repo)
            .add_category(name)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(category) => ActionResponse::success("Category added.", Some(category.id.to_string())),
        Err(err) => ActionResponse::failure(format!("category_add failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn category_rename(id: String, name: String) -> ActionResponse {
    let result = with_connection(|conn| {
        let id = parse_id(&id, "category id")?;
        let repo = SqliteCategoryRepository::try_new(conn).map_err(|err| err.to_string())?;
        CategoryService::new(repo)
            .rename_category(id, name)
            .map_err(|err| err.to_string())?;
        Ok(id)
    });
    match result {
        Ok(id) => ActionResponse::success("Category renamed.", Some(id.to_string())),
        Err(err) => ActionResponse::failure(format!("category_rename failed: {err}")),
    }
}

/// Deletes a non-default category with no documents.
#[flutter_rust_bridge::frb(sync)]
pub fn category_delete(id: String) -> ActionResponse {
    let result = with_connection(|conn| {
        let id = parse_id(&id, "category id")?;
        let repo = SqliteCategoryRepository::try_new(conn).map_err(|err| err.to_string())?;
        CategoryService::new(repo)
            .delete_category(id)
            .map_err(|err| err.to_string())?;
        Ok(id)
    });
    match result {
        Ok(id) => ActionResponse::success("Category deleted.", Some(id.to_string())),
        Err(err) => ActionResponse::failure(format!("category_delete failed: {err}")),
    }
}

/// Moves the category at `index` up one position; returns the new order.
///
/// At the top of the list this is a no-op that still returns `ok=true`.
#[flutter_rust_bridge::frb(sync)]
pub fn category_move_up(index: u32) -> CategoryListResponse {
    category_move("category_move_up", index, |store, index| {
        store.move_up(index)
    })
}

/// Moves the category at `index` down one position; returns the new order.
#[flutter_rust_bridge::frb(sync)]
pub fn category_move_down(index: u32) -> CategoryListResponse {
    category_move("category_move_down", index, |store, index| {
        store.move_down(index)
    })
}

/// Lists documents filtered by optional category and search text.
#[flutter_rust_bridge::frb(sync)]
pub fn document_list(category_id: Option<String>, search: String) -> DocumentListResponse {
    let result = with_connection(|conn| {
        let category_id = category_id
            .as_deref()
            .map(|value| parse_id(value, "category id"))
            .transpose()?;
        let repo = SqliteDocumentRepository::try_new(conn).map_err(|err| err.to_string())?;
        DocumentService::new(repo)
            .query_documents(&DocumentQuery::new(category_id, search))
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(documents) => {
            let items = documents.iter().map(to_document_item).collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No documents.".to_string()
            } else {
                format!("Found {} document(s).", items.len())
            };
            DocumentListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => DocumentListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("document_list failed: {err}"),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn document_get(id: String) -> DocumentDetailResponse {
    let result = with_connection(|conn| {
        let id = parse_id(&id, "document id")?;
        let repo = SqliteDocumentRepository::try_new(conn).map_err(|err| err.to_string())?;
        DocumentService::new(repo)
            .get_document(id)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(Some(document)) => DocumentDetailResponse {
            ok: true,
            item: Some(to_document_item(&document)),
            message: String::new(),
        },
        Ok(None) => DocumentDetailResponse {
            ok: true,
            item: None,
            message: "Document not found.".to_string(),
        },
        Err(err) => DocumentDetailResponse {
            ok: false,
            item: None,
            message: format!("document_get failed: {err}"),
        },
    }
}

/// Creates (`document_id=None`) or updates a document from form fields.
///
/// `file_paths` are paths already copied into app-private storage.
#[flutter_rust_bridge::frb(sync)]
pub fn document_save(
    document_id: Option<String>,
    title: String,
    category_id: Option<String>,
    memo: String,
    file_paths: Vec<String>,
) -> ActionResponse {
    let result = with_connection(|conn| {
        let draft = DocumentDraft {
            document_id: document_id
                .as_deref()
                .map(|value| parse_id(value, "document id"))
                .transpose()?,
            title,
            category_id: category_id
                .as_deref()
                .map(|value| parse_id(value, "category id"))
                .transpose()?,
            memo,
            file_paths,
        };
        let repo = SqliteDocumentRepository::try_new(conn).map_err(|err| err.to_string())?;
        DocumentService::new(repo)
            .save_draft(&draft)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(document) => ActionResponse::success("Document saved.", Some(document.id.to_string())),
        Err(err) => ActionResponse::failure(format!("document_save failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn document_delete(id: String) -> ActionResponse {
    let result = with_connection(|conn| {
        let id = parse_id(&id, "document id")?;
        let repo = SqliteDocumentRepository::try_new(conn).map_err(|err| err.to_string())?;
        DocumentService::new(repo)
            .delete_document(id)
            .map_err(|err| err.to_string())?;
        Ok(id)
    });
    match result {
        Ok(id) => ActionResponse::success("Document deleted.", Some(id.to_string())),
        Err(err) => ActionResponse::failure(format!("document_delete failed: {err}")),
    }
}

/// Records one share after the UI handed files to the OS share sheet.
#[flutter_rust_bridge::frb(sync)]
pub fn document_share(id: String) -> DocumentDetailResponse {
    let result = with_connection(|conn| {
        let id = parse_id(&id, "document id")?;
        let repo = SqliteDocumentRepository::try_new(conn).map_err(|err| err.to_string())?;
        DocumentService::new(repo)
            .record_share(id)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(document) => DocumentDetailResponse {
            ok: true,
            message: format!("Shared {} time(s).", document.share_count),
            item: Some(to_document_item(&document)),
        },
        Err(err) => DocumentDetailResponse {
            ok: false,
            item: None,
            message: format!("document_share failed: {err}"),
        },
    }
}

fn category_move(
    operation: &'static str,
    index: u32,
    apply: impl FnOnce(
        &mut CategoryOrderStore<SqliteCategoryRepository<'_>>,
        usize,
    ) -> Result<bool, fileshare_core::CategoryOrderError>,
) -> CategoryListResponse {
    let result = with_connection(|conn| {
        let repo = SqliteCategoryRepository::try_new(conn).map_err(|err| err.to_string())?;
        let mut store = CategoryOrderStore::load(repo).map_err(|err| err.to_string())?;
        let index = usize::try_from(index).map_err(|err| err.to_string())?;
        apply(&mut store, index).map_err(|err| err.to_string())?;
        Ok(store.categories().to_vec())
    });
    category_list_response(operation, result)
}

fn category_list_response(
    operation: &'static str,
    result: Result<Vec<Category>, String>,
) -> CategoryListResponse {
    match result {
        Ok(categories) => CategoryListResponse {
            ok: true,
            items: categories.iter().map(to_category_item).collect(),
            message: String::new(),
        },
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op={operation}");
            CategoryListResponse {
                ok: false,
                items: Vec::new(),
                message: format!("{operation} failed: {err}"),
            }
        }
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_connection<T>(f: impl FnOnce(&Connection) -> Result<T, String>) -> Result<T, String> {
    let conn = open_db(resolve_db_path()).map_err(|err| format!("DB open failed: {err}"))?;
    f(&conn)
}

fn parse_id(value: &str, label: &str) -> Result<Uuid, String> {
    Uuid::parse_str(value.trim()).map_err(|_| format!("invalid {label} `{value}`"))
}

fn to_category_item(category: &Category) -> CategoryItem {
    CategoryItem {
        id: category.id.to_string(),
        name: category.name.clone(),
        sort_order: category.sort_order,
        is_default: category.is_default,
    }
}

fn to_document_item(document: &Document) -> DocumentItem {
    DocumentItem {
        id: document.id.to_string(),
        title: document.title.clone(),
        category_id: document.category_id.to_string(),
        file_paths: document.file_paths.clone(),
        memo: document.memo.clone(),
        size_bytes: document.size_bytes,
        mime_type: document.mime_type.clone(),
        created_at: document.created_at,
        updated_at: document.updated_at,
        share_count: document.share_count,
    }
}
