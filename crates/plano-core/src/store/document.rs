//! Document store backed by redb.
//!
//! One table per [`Collection`], keyed by record id. Values are the
//! JSON-encoded [`Document`] so the parent key travels with the body.
//! Parent filtering is a full-table scan, which is what a schemaless
//! document store gives us without secondary indexes.

use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};

use crate::error::{PlanoError, Result};
use crate::record::{Collection, Document};
use crate::repository::Repository;

fn table(collection: Collection) -> TableDefinition<'static, &'static str, &'static [u8]> {
    TableDefinition::new(collection.as_str())
}

/// redb-backed [`Repository`].
pub struct DocumentStore {
    db: Database,
}

impl DocumentStore {
    /// Open or create the database at `path`, creating every collection
    /// table up front so reads never hit a missing table.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path).map_err(PlanoError::storage)?;
        let wt = db.begin_write().map_err(PlanoError::storage)?;
        for &collection in Collection::all() {
            wt.open_table(table(collection))
                .map_err(PlanoError::storage)?;
        }
        wt.commit().map_err(PlanoError::storage)?;
        tracing::debug!(path = %path.display(), "document store opened");
        Ok(Self { db })
    }
}

fn encode(doc: &Document) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(doc)?)
}

fn decode(bytes: &[u8]) -> Result<Document> {
    Ok(serde_json::from_slice(bytes)?)
}

impl Repository for DocumentStore {
    fn backend(&self) -> &'static str {
        "document"
    }

    fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>> {
        let rt = self.db.begin_read().map_err(PlanoError::storage)?;
        let t = rt
            .open_table(table(collection))
            .map_err(PlanoError::storage)?;
        let value = t.get(id).map_err(PlanoError::storage)?;
        value.map(|v| decode(v.value())).transpose()
    }

    fn list(&self, collection: Collection, parent_id: Option<&str>) -> Result<Vec<Document>> {
        let rt = self.db.begin_read().map_err(PlanoError::storage)?;
        let t = rt
            .open_table(table(collection))
            .map_err(PlanoError::storage)?;

        let mut result = Vec::new();
        for entry in t.iter().map_err(PlanoError::storage)? {
            let (_, v) = entry.map_err(PlanoError::storage)?;
            let doc = decode(v.value())?;
            if parent_id.is_none() || doc.parent_id.as_deref() == parent_id {
                result.push(doc);
            }
        }
        Ok(result)
    }

    fn insert(&self, collection: Collection, doc: &Document) -> Result<()> {
        let value = encode(doc)?;
        let wt = self.db.begin_write().map_err(PlanoError::storage)?;
        {
            let mut t = wt
                .open_table(table(collection))
                .map_err(PlanoError::storage)?;
            if t.get(doc.id.as_str()).map_err(PlanoError::storage)?.is_some() {
                return Err(PlanoError::RecordExists {
                    collection: collection.to_string(),
                    id: doc.id.clone(),
                });
            }
            t.insert(doc.id.as_str(), value.as_slice())
                .map_err(PlanoError::storage)?;
        }
        wt.commit().map_err(PlanoError::storage)?;
        Ok(())
    }

    fn insert_bounded(
        &self,
        collection: Collection,
        doc: &Document,
        limit: usize,
    ) -> Result<bool> {
        let value = encode(doc)?;
        // redb admits one write transaction at a time; counting inside it
        // keeps the check and the insert together.
        let wt = self.db.begin_write().map_err(PlanoError::storage)?;
        {
            let mut t = wt
                .open_table(table(collection))
                .map_err(PlanoError::storage)?;
            let mut siblings = 0usize;
            for entry in t.iter().map_err(PlanoError::storage)? {
                let (_, v) = entry.map_err(PlanoError::storage)?;
                if decode(v.value())?.parent_id == doc.parent_id {
                    siblings += 1;
                }
            }
            if siblings >= limit {
                return Ok(false);
            }
            if t.get(doc.id.as_str()).map_err(PlanoError::storage)?.is_some() {
                return Err(PlanoError::RecordExists {
                    collection: collection.to_string(),
                    id: doc.id.clone(),
                });
            }
            t.insert(doc.id.as_str(), value.as_slice())
                .map_err(PlanoError::storage)?;
        }
        wt.commit().map_err(PlanoError::storage)?;
        Ok(true)
    }

    fn update(&self, collection: Collection, doc: &Document) -> Result<()> {
        let value = encode(doc)?;
        let wt = self.db.begin_write().map_err(PlanoError::storage)?;
        {
            let mut t = wt
                .open_table(table(collection))
                .map_err(PlanoError::storage)?;
            if t.get(doc.id.as_str()).map_err(PlanoError::storage)?.is_none() {
                return Err(PlanoError::RecordNotFound {
                    collection: collection.to_string(),
                    id: doc.id.clone(),
                });
            }
            t.insert(doc.id.as_str(), value.as_slice())
                .map_err(PlanoError::storage)?;
        }
        wt.commit().map_err(PlanoError::storage)?;
        Ok(())
    }

    fn delete(&self, collection: Collection, id: &str) -> Result<bool> {
        let wt = self.db.begin_write().map_err(PlanoError::storage)?;
        let removed = {
            let mut t = wt
                .open_table(table(collection))
                .map_err(PlanoError::storage)?;
            let old = t.remove(id).map_err(PlanoError::storage)?;
            old.is_some()
        };
        wt.commit().map_err(PlanoError::storage)?;
        Ok(removed)
    }
}
