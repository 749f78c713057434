//! Relational store backed by SQLite.
//!
//! Each [`Collection`] maps to a table with an `id` primary key, an indexed
//! `parent_id` column and the JSON body, so parent-filtered listings are
//! index lookups rather than scans.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, TransactionBehavior};

use crate::error::{PlanoError, Result};
use crate::record::{Collection, Document};
use crate::repository::Repository;

/// SQLite-backed [`Repository`]. Access is serialized through one connection.
pub struct SqlStore {
    conn: Mutex<Connection>,
}

impl SqlStore {
    /// Open or create the database file and apply the schema.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path).map_err(PlanoError::storage)?;
        apply_schema(&conn)?;
        tracing::debug!(path = %path.display(), "sql store opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(PlanoError::storage)?;
        apply_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| PlanoError::Storage("sqlite connection lock poisoned".into()))
    }
}

fn apply_schema(conn: &Connection) -> Result<()> {
    let mut sql = String::from("PRAGMA foreign_keys = OFF;\n");
    for collection in Collection::all() {
        let name = collection.as_str();
        sql.push_str(&format!(
            "CREATE TABLE IF NOT EXISTS {name} (
                id TEXT PRIMARY KEY,
                parent_id TEXT,
                body TEXT NOT NULL,
                stored_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_{name}_parent ON {name}(parent_id);\n"
        ));
    }
    conn.execute_batch(&sql).map_err(PlanoError::storage)
}

fn row_to_document(id: String, parent_id: Option<String>, body: String) -> Result<Document> {
    Ok(Document {
        id,
        parent_id,
        body: serde_json::from_str(&body)?,
    })
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation
    )
}

fn insert_row(conn: &Connection, collection: Collection, doc: &Document) -> Result<()> {
    let body = serde_json::to_string(&doc.body)?;
    conn.execute(
        &format!(
            "INSERT INTO {collection} (id, parent_id, body, stored_at) VALUES (?1, ?2, ?3, ?4)"
        ),
        params![doc.id, doc.parent_id, body, Utc::now().to_rfc3339()],
    )
    .map_err(|e| {
        if is_constraint_violation(&e) {
            PlanoError::RecordExists {
                collection: collection.to_string(),
                id: doc.id.clone(),
            }
        } else {
            PlanoError::storage(e)
        }
    })?;
    Ok(())
}

impl Repository for SqlStore {
    fn backend(&self) -> &'static str {
        "sql"
    }

    fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("SELECT id, parent_id, body FROM {collection} WHERE id = ?1"),
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .map_err(PlanoError::storage)?;
        row.map(|(id, parent, body)| row_to_document(id, parent, body))
            .transpose()
    }

    fn list(&self, collection: Collection, parent_id: Option<&str>) -> Result<Vec<Document>> {
        let conn = self.conn()?;
        let rows: Vec<(String, Option<String>, String)> = match parent_id {
            Some(parent) => {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT id, parent_id, body FROM {collection} WHERE parent_id = ?1"
                    ))
                    .map_err(PlanoError::storage)?;
                let mapped = stmt
                    .query_map(params![parent], |row| {
                        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                    })
                    .map_err(PlanoError::storage)?;
                mapped
                    .collect::<rusqlite::Result<_>>()
                    .map_err(PlanoError::storage)?
            }
            None => {
                let mut stmt = conn
                    .prepare(&format!("SELECT id, parent_id, body FROM {collection}"))
                    .map_err(PlanoError::storage)?;
                let mapped = stmt
                    .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
                    .map_err(PlanoError::storage)?;
                mapped
                    .collect::<rusqlite::Result<_>>()
                    .map_err(PlanoError::storage)?
            }
        };
        rows.into_iter()
            .map(|(id, parent, body)| row_to_document(id, parent, body))
            .collect()
    }

    fn insert(&self, collection: Collection, doc: &Document) -> Result<()> {
        let conn = self.conn()?;
        insert_row(&conn, collection, doc)
    }

    fn insert_bounded(
        &self,
        collection: Collection,
        doc: &Document,
        limit: usize,
    ) -> Result<bool> {
        let mut conn = self.conn()?;
        // IMMEDIATE takes the write lock up front, so another process cannot
        // insert between the count and the write.
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(PlanoError::storage)?;
        let count: i64 = tx
            .query_row(
                &format!("SELECT COUNT(*) FROM {collection} WHERE parent_id IS ?1"),
                params![doc.parent_id],
                |row| row.get(0),
            )
            .map_err(PlanoError::storage)?;
        if count as usize >= limit {
            return Ok(false);
        }
        insert_row(&tx, collection, doc)?;
        tx.commit().map_err(PlanoError::storage)?;
        Ok(true)
    }

    fn update(&self, collection: Collection, doc: &Document) -> Result<()> {
        let body = serde_json::to_string(&doc.body)?;
        let conn = self.conn()?;
        let changed = conn
            .execute(
                &format!(
                    "UPDATE {collection} SET parent_id = ?2, body = ?3, stored_at = ?4 WHERE id = ?1"
                ),
                params![doc.id, doc.parent_id, body, Utc::now().to_rfc3339()],
            )
            .map_err(PlanoError::storage)?;
        if changed == 0 {
            return Err(PlanoError::RecordNotFound {
                collection: collection.to_string(),
                id: doc.id.clone(),
            });
        }
        Ok(())
    }

    fn delete(&self, collection: Collection, id: &str) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                &format!("DELETE FROM {collection} WHERE id = ?1"),
                params![id],
            )
            .map_err(PlanoError::storage)?;
        Ok(changed > 0)
    }
}
