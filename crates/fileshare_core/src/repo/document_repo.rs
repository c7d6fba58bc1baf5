//! Document repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over `documents` plus their ordered `document_files`.
//! - Own share counting so it can only ever increment.
//!
//! # Invariants
//! - Write paths call `Document::validate()` before SQL mutations.
//! - A document row and its file rows are written in one transaction.
//! - Listing is deterministic: `updated_at DESC`, newest insert first on ties.
//! - `update_document` never changes `created_at` or `share_count`.

use crate::db::ensure_schema_ready;
use crate::model::category::CategoryId;
use crate::model::document::{Document, DocumentId};
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const DOCUMENT_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    category_uuid,
    memo,
    size_bytes,
    mime_type,
    share_count,
    created_at,
    updated_at
FROM documents";

/// Repository interface for the document half of the store.
pub trait DocumentRepository {
    /// Inserts one document and its files; returns the stable id.
    fn create_document(&self, document: &Document) -> RepoResult<DocumentId>;
    /// Replaces mutable fields and the whole file list of one document.
    fn update_document(&self, document: &Document) -> RepoResult<()>;
    /// Loads one document by id.
    fn get_document(&self, id: DocumentId) -> RepoResult<Option<Document>>;
    /// Lists every document, most recently updated first.
    fn list_documents(&self) -> RepoResult<Vec<Document>>;
    /// Hard-deletes one document and its file rows.
    fn delete_document(&self, id: DocumentId) -> RepoResult<()>;
    /// Adds one to the share counter.
    fn increment_share_count(&self, id: DocumentId) -> RepoResult<()>;
    /// Checks the category a document is about to reference.
    fn category_exists(&self, id: CategoryId) -> RepoResult<bool>;
}

/// SQLite-backed document repository.
pub struct SqliteDocumentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["categories", "documents", "document_files"])?;
        Ok(Self { conn })
    }
}

impl DocumentRepository for SqliteDocumentRepository<'_> {
    fn create_document(&self, document: &Document) -> RepoResult<DocumentId> {
        document.validate()?;
        let size_bytes = size_to_db(document.size_bytes)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO documents (
                uuid,
                title,
                category_uuid,
                memo,
                size_bytes,
                mime_type,
                share_count
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                document.id.to_string(),
                document.title.as_str(),
                document.category_id.to_string(),
                document.memo.as_deref(),
                size_bytes,
                document.mime_type.as_str(),
                i64::from(document.share_count),
            ],
        )?;
        write_file_paths(&tx, document)?;
        tx.commit()?;

        Ok(document.id)
    }

    fn update_document(&self, document: &Document) -> RepoResult<()> {
        document.validate()?;
        let size_bytes = size_to_db(document.size_bytes)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE documents
             SET
                title = ?2,
                category_uuid = ?3,
                memo = ?4,
                size_bytes = ?5,
                mime_type = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![
                document.id.to_string(),
                document.title.as_str(),
                document.category_id.to_string(),
                document.memo.as_deref(),
                size_bytes,
                document.mime_type.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::DocumentNotFound(document.id));
        }

        tx.execute(
            "DELETE FROM document_files WHERE document_uuid = ?1;",
            [document.id.to_string()],
        )?;
        write_file_paths(&tx, document)?;
        tx.commit()?;
        Ok(())
    }

    fn get_document(&self, id: DocumentId) -> RepoResult<Option<Document>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DOCUMENT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_document_row(self.conn, row)?));
        }
        Ok(None)
    }

    fn list_documents(&self) -> RepoResult<Vec<Document>> {
        let mut stmt = self.conn.prepare(&format!(
            "{DOCUMENT_SELECT_SQL} ORDER BY updated_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next()? {
            documents.push(parse_document_row(self.conn, row)?);
        }
        Ok(documents)
    }

    fn delete_document(&self, id: DocumentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM documents WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::DocumentNotFound(id));
        }
        Ok(())
    }

    fn increment_share_count(&self, id: DocumentId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE documents
             SET share_count = share_count + 1
             WHERE uuid = ?1;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::DocumentNotFound(id));
        }
        Ok(())
    }

    fn category_exists(&self, id: CategoryId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE uuid = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn write_file_paths(conn: &Connection, document: &Document) -> RepoResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO document_files (document_uuid, position, path)
         VALUES (?1, ?2, ?3);",
    )?;
    let document_uuid = document.id.to_string();
    for (position, path) in document.file_paths.iter().enumerate() {
        stmt.execute(params![document_uuid, position as i64, path])?;
    }
    Ok(())
}

fn load_file_paths(conn: &Connection, document_uuid: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT path
         FROM document_files
         WHERE document_uuid = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([document_uuid])?;
    let mut paths = Vec::new();
    while let Some(row) = rows.next()? {
        paths.push(row.get(0)?);
    }
    Ok(paths)
}

fn parse_document_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Document> {
    let uuid_text: String = row.get("uuid")?;
    let category_text: String = row.get("category_uuid")?;

    let size_bytes: i64 = row.get("size_bytes")?;
    let size_bytes = u64::try_from(size_bytes).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid size_bytes `{size_bytes}` in documents.size_bytes"
        ))
    })?;
    let share_count: i64 = row.get("share_count")?;
    let share_count = u32::try_from(share_count).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid share_count `{share_count}` in documents.share_count"
        ))
    })?;

    let document = Document {
        id: parse_uuid(&uuid_text, "documents.uuid")?,
        title: row.get("title")?,
        category_id: parse_uuid(&category_text, "documents.category_uuid")?,
        file_paths: load_file_paths(conn, &uuid_text)?,
        memo: row.get("memo")?,
        size_bytes,
        mime_type: row.get("mime_type")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        share_count,
    };
    document
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("document {uuid_text}: {err}")))?;
    Ok(document)
}

fn size_to_db(size_bytes: u64) -> RepoResult<i64> {
    i64::try_from(size_bytes)
        .map_err(|_| RepoError::InvalidData(format!("size_bytes `{size_bytes}` exceeds i64")))
}
