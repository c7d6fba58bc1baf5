//! Category repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist categories and their manual display order.
//! - Keep ordinal renumbering inside the repository boundary.
//!
//! # Invariants
//! - Listing is deterministic: `sort_order ASC, uuid ASC`.
//! - After create, delete, or order persistence, `sort_order` values are
//!   exactly `0..count`.
//! - Multi-row writes run in one `IMMEDIATE` transaction.

use crate::db::ensure_schema_ready;
use crate::model::category::{Category, CategoryId, CategoryValidationError};
use crate::repo::{parse_flag, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::collections::HashSet;

const CATEGORY_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    sort_order,
    is_default,
    created_at,
    updated_at
FROM categories";

/// Repository interface for the category half of the store.
pub trait CategoryRepository {
    /// Creates a user category appended after the last ordinal.
    fn create_category(&self, name: &str) -> RepoResult<Category>;
    /// Loads one category by id.
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    /// Lists all categories in display order.
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    /// Renames one category.
    fn rename_category(&self, id: CategoryId, name: &str) -> RepoResult<()>;
    /// Deletes one category and closes the ordinal gap it leaves.
    fn delete_category(&self, id: CategoryId) -> RepoResult<()>;
    /// Rewrites ordinals so that `ordered_ids[i]` gets `sort_order = i`.
    ///
    /// `ordered_ids` must be a permutation of every stored category id.
    fn persist_category_order(&self, ordered_ids: &[CategoryId]) -> RepoResult<()>;
    /// Counts documents filed under one category.
    fn count_documents(&self, id: CategoryId) -> RepoResult<u64>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["categories", "documents"])?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(&self, name: &str) -> RepoResult<Category> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let category = Category::new(name, next_sort_order(&tx)?);
        category.validate()?;

        tx.execute(
            "INSERT INTO categories (uuid, name, sort_order, is_default)
             VALUES (?1, ?2, ?3, 0);",
            params![
                category.id.to_string(),
                category.name.as_str(),
                category.sort_order
            ],
        )?;
        let created = load_category(&tx, category.id)?
            .ok_or_else(|| RepoError::InvalidData("created category missing".to_string()))?;
        tx.commit()?;
        Ok(created)
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        load_category(self.conn, id)
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} ORDER BY sort_order ASC, uuid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_category_row(row)?);
        }
        Ok(items)
    }

    fn rename_category(&self, id: CategoryId, name: &str) -> RepoResult<()> {
        if name.trim().is_empty() {
            return Err(CategoryValidationError::BlankName.into());
        }

        let changed = self.conn.execute(
            "UPDATE categories
             SET name = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![id.to_string(), name],
        )?;
        if changed == 0 {
            return Err(RepoError::CategoryNotFound(id));
        }
        Ok(())
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute("DELETE FROM categories WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::CategoryNotFound(id));
        }

        let remaining = list_ordered_ids(&tx)?;
        write_sort_orders(&tx, &remaining)?;
        tx.commit()?;
        Ok(())
    }

    fn persist_category_order(&self, ordered_ids: &[CategoryId]) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let stored = list_ordered_ids(&tx)?;
        ensure_permutation(&stored, ordered_ids)?;
        write_sort_orders(&tx, ordered_ids)?;
        tx.commit()?;
        Ok(())
    }

    fn count_documents(&self, id: CategoryId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE category_uuid = ?1;",
            [id.to_string()],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative document count `{count}`")))
    }
}

fn load_category(conn: &Connection, id: CategoryId) -> RepoResult<Option<Category>> {
    let mut stmt = conn.prepare(&format!("{CATEGORY_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_category_row(row)?));
    }
    Ok(None)
}

fn next_sort_order(conn: &Connection) -> RepoResult<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM categories;", [], |row| row.get(0))?;
    Ok(count)
}

fn list_ordered_ids(conn: &Connection) -> RepoResult<Vec<CategoryId>> {
    let mut stmt = conn.prepare("SELECT uuid FROM categories ORDER BY sort_order ASC, uuid ASC;")?;
    let mut rows = stmt.query([])?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        let text: String = row.get(0)?;
        ids.push(parse_uuid(&text, "categories.uuid")?);
    }
    Ok(ids)
}

fn ensure_permutation(stored: &[CategoryId], proposed: &[CategoryId]) -> RepoResult<()> {
    if stored.len() != proposed.len() {
        return Err(RepoError::InvalidOrder(format!(
            "expected {} ids, got {}",
            stored.len(),
            proposed.len()
        )));
    }

    let mut seen = HashSet::with_capacity(proposed.len());
    for id in proposed {
        if !seen.insert(*id) {
            return Err(RepoError::InvalidOrder(format!("duplicate id {id}")));
        }
    }
    if let Some(missing) = stored.iter().find(|id| !seen.contains(*id)) {
        return Err(RepoError::InvalidOrder(format!("missing id {missing}")));
    }
    Ok(())
}

fn write_sort_orders(conn: &Connection, ordered_ids: &[CategoryId]) -> RepoResult<()> {
    for (index, id) in ordered_ids.iter().enumerate() {
        conn.execute(
            "UPDATE categories
             SET sort_order = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND sort_order != ?2;",
            params![id.to_string(), index as i64],
        )?;
    }
    Ok(())
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let uuid_text: String = row.get("uuid")?;
    let category = Category {
        id: parse_uuid(&uuid_text, "categories.uuid")?,
        name: row.get("name")?,
        sort_order: row.get("sort_order")?,
        is_default: parse_flag(row.get("is_default")?, "categories.is_default")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    category
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("category {uuid_text}: {err}")))?;
    Ok(category)
}

