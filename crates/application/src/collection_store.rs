use skmis_core::RecordId;
use skmis_domain::ManagedRecord;

/// Unfiltered records most recently fetched from a collection endpoint.
///
/// Replaced wholesale on every re-fetch; never patched locally.
#[derive(Debug, Clone)]
pub struct CollectionStore<R> {
    records: Vec<R>,
}

impl<R> Default for CollectionStore<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R: ManagedRecord> CollectionStore<R> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored records with a fresh fetch.
    pub fn replace(&mut self, records: Vec<R>) {
        self.records = records;
    }

    /// Returns all stored records in backend order.
    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }
}
