//! Persistence boundary.
//!
//! [`Repository`] is object-safe and works on untyped [`Document`]s so the
//! two adapters in [`crate::store`] can be swapped behind `dyn Repository`.
//! [`RepositoryExt`] layers the typed CRUD helpers the rules use on top.

use crate::error::{PlanoError, Result};
use crate::record::{Collection, Document, Record};

pub trait Repository: Send + Sync {
    /// Short backend name for logs and `plano` output.
    fn backend(&self) -> &'static str;

    fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>>;

    /// All documents of `collection`, or only those whose parent key equals
    /// `parent_id` when given.
    fn list(&self, collection: Collection, parent_id: Option<&str>) -> Result<Vec<Document>>;

    /// Fails with `RecordExists` if the id is taken.
    fn insert(&self, collection: Collection, doc: &Document) -> Result<()>;

    /// Insert `doc` only while fewer than `limit` documents share its parent
    /// key. Counting and writing happen in one transaction. Returns `false`,
    /// writing nothing, when the parent is already full.
    fn insert_bounded(&self, collection: Collection, doc: &Document, limit: usize)
        -> Result<bool>;

    /// Fails with `RecordNotFound` if the id is unknown.
    fn update(&self, collection: Collection, doc: &Document) -> Result<()>;

    /// Hard delete. Returns `false` if nothing was stored under `id`.
    fn delete(&self, collection: Collection, id: &str) -> Result<bool>;
}

pub trait RepositoryExt: Repository {
    fn fetch<R: Record>(&self, id: &str) -> Result<Option<R>> {
        self.get(R::COLLECTION, id)?
            .map(R::from_document)
            .transpose()
    }

    fn load<R: Record>(&self, id: &str) -> Result<R> {
        self.fetch(id)?.ok_or_else(|| R::not_found(id))
    }

    fn exists<R: Record>(&self, id: &str) -> Result<bool> {
        Ok(self.get(R::COLLECTION, id)?.is_some())
    }

    /// Every record of the type, oldest first.
    fn list_all<R: Record>(&self) -> Result<Vec<R>> {
        decode_sorted(self.list(R::COLLECTION, None)?)
    }

    /// Records whose parent key equals `parent_id`, oldest first.
    fn list_by<R: Record>(&self, parent_id: &str) -> Result<Vec<R>> {
        if R::COLLECTION.parent_field().is_none() {
            return Err(PlanoError::Validation(format!(
                "{} has no parent key",
                R::COLLECTION
            )));
        }
        decode_sorted(self.list(R::COLLECTION, Some(parent_id))?)
    }

    fn insert_record<R: Record>(&self, record: &R) -> Result<()> {
        record.validate()?;
        self.insert(R::COLLECTION, &record.to_document()?)
    }

    /// Validate and insert unless the record's parent already holds `limit`
    /// records of the type.
    fn insert_bounded_record<R: Record>(&self, record: &R, limit: usize) -> Result<bool> {
        record.validate()?;
        self.insert_bounded(R::COLLECTION, &record.to_document()?, limit)
    }

    /// Insert `record` after checking that its parent `P` exists.
    fn insert_child<P: Record, R: Record>(&self, record: &R) -> Result<()> {
        if let Some(parent_id) = record.parent_id() {
            self.load::<P>(parent_id)?;
        }
        self.insert_record(record)
    }

    /// Validate, bump `updated_at` and persist.
    fn update_record<R: Record>(&self, record: &mut R) -> Result<()> {
        record.validate()?;
        record.touch();
        self.update(R::COLLECTION, &record.to_document()?)
    }

    fn delete_record<R: Record>(&self, id: &str) -> Result<bool> {
        self.delete(R::COLLECTION, id)
    }
}

impl<T: Repository + ?Sized> RepositoryExt for T {}

fn decode_sorted<R: Record>(docs: Vec<Document>) -> Result<Vec<R>> {
    let mut records = docs
        .into_iter()
        .map(R::from_document)
        .collect::<Result<Vec<R>>>()?;
    records.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(b.id()))
    });
    Ok(records)
}
