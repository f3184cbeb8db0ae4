//! # In-Memory Store
//!
//! A [`FeedStore`] that keeps collections and rows in a `HashMap`, assigning
//! ids and versioned edit links the way the real service does. Updates through
//! a stale edit link are rejected, so optimistic-concurrency bugs show up in
//! tests instead of silently overwriting rows.
//!
//! Row ids come from a shared counter: `memory://{store}/{collection}/{row}`.
//! Edit links append the row version: `memory://{store}/{collection}/{row}/{version}`.

use crate::framework::{Document, FeedError, FeedResult, FeedStore};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

const SCHEME: &str = "memory://";

struct Row {
    version: u64,
    document: Document,
}

struct Collection {
    title: String,
    rows: BTreeMap<u64, Row>,
}

/// Collections keyed by store id, then by collection id.
type Stores = HashMap<String, BTreeMap<String, Collection>>;

pub struct MemoryStore {
    stores: Mutex<Stores>,
    next_row_id: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            stores: Mutex::new(HashMap::new()),
            next_row_id: AtomicU64::new(1),
        }
    }

    /// Builder form of [`add_collection`](Self::add_collection).
    pub fn with_collection(self, store_id: &str, collection_id: &str, title: &str) -> Self {
        self.add_collection(store_id, collection_id, title);
        self
    }

    /// Adds an empty collection. An existing one with the same id is kept.
    pub fn add_collection(&self, store_id: &str, collection_id: &str, title: &str) {
        self.stores
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(store_id.to_string())
            .or_default()
            .entry(collection_id.to_string())
            .or_insert_with(|| Collection {
                title: title.to_string(),
                rows: BTreeMap::new(),
            });
    }

    /// Snapshot of a collection's rows in creation order.
    pub fn rows(&self, store_id: &str, collection_id: &str) -> FeedResult<Vec<Document>> {
        let mut stores = self.lock()?;
        let collection = collection_mut(&mut stores, store_id, collection_id)?;
        Ok(collection.rows.values().map(|row| row.document.clone()).collect())
    }

    fn lock(&self) -> FeedResult<MutexGuard<'_, Stores>> {
        self.stores
            .lock()
            .map_err(|_| FeedError::Transport("memory store poisoned".to_string()))
    }
}

fn collection_mut<'a>(
    stores: &'a mut Stores,
    store_id: &str,
    collection_id: &str,
) -> FeedResult<&'a mut Collection> {
    stores
        .get_mut(store_id)
        .and_then(|collections| collections.get_mut(collection_id))
        .ok_or_else(|| {
            FeedError::Transport(format!("404: no collection {store_id}/{collection_id}"))
        })
}

fn row_url(store_id: &str, collection_id: &str, row_id: u64) -> String {
    format!("{SCHEME}{store_id}/{collection_id}/{row_id}")
}

/// Splits an edit link into (store, collection, row, version).
fn parse_edit_link(link: &str) -> Option<(&str, &str, u64, u64)> {
    let mut parts = link.strip_prefix(SCHEME)?.split('/');
    let store_id = parts.next()?;
    let collection_id = parts.next()?;
    let row_id = parts.next()?.parse().ok()?;
    let version = parts.next()?.parse().ok()?;
    match parts.next() {
        Some(_) => None,
        None => Some((store_id, collection_id, row_id, version)),
    }
}

fn stamp(document: &Document, store_id: &str, collection_id: &str, row_id: u64, version: u64) -> Document {
    let url = row_url(store_id, collection_id, row_id);
    let mut stored = document.clone();
    stored.set_identity(url.as_str());
    stored.set_edit_link(&format!("{url}/{version}"));
    stored
}

impl FeedStore for MemoryStore {
    fn resolve_collection_id(&self, store_id: &str, collection_name: &str) -> FeedResult<String> {
        let stores = self.lock()?;
        stores
            .get(store_id)
            .and_then(|collections| {
                collections
                    .iter()
                    .find(|(_, c)| c.title.eq_ignore_ascii_case(collection_name))
            })
            .map(|(id, _)| id.clone())
            .ok_or_else(|| FeedError::CollectionNotFound(collection_name.to_string()))
    }

    fn find_document(
        &self,
        store_id: &str,
        collection_id: &str,
        identity_field: &str,
        identity_value: &str,
    ) -> FeedResult<Option<Document>> {
        let mut stores = self.lock()?;
        let collection = collection_mut(&mut stores, store_id, collection_id)?;
        let found = collection
            .rows
            .values()
            .map(|row| &row.document)
            .find(|doc| {
                doc.read(identity_field)
                    .is_some_and(|value| value.eq_ignore_ascii_case(identity_value))
            })
            .cloned();
        debug!(identity_field, identity_value, found = found.is_some(), "Lookup");
        Ok(found)
    }

    fn create_document(
        &self,
        store_id: &str,
        collection_id: &str,
        document: &Document,
    ) -> FeedResult<Document> {
        let mut stores = self.lock()?;
        let collection = collection_mut(&mut stores, store_id, collection_id)?;
        let row_id = self.next_row_id.fetch_add(1, Ordering::SeqCst);
        let stored = stamp(document, store_id, collection_id, row_id, 1);

        collection.rows.insert(
            row_id,
            Row {
                version: 1,
                document: stored.clone(),
            },
        );
        info!(%collection_id, row_id, size = collection.rows.len(), "Created");
        Ok(stored)
    }

    fn update_document(&self, store_id: &str, document: &Document) -> FeedResult<Document> {
        let link = document
            .edit_link()
            .ok_or_else(|| FeedError::Transport("400: document has no edit link".to_string()))?;
        let (link_store, collection_id, row_id, version) = parse_edit_link(link)
            .filter(|(link_store, ..)| *link_store == store_id)
            .ok_or_else(|| FeedError::Transport(format!("400: bad edit link {link}")))?;

        let mut stores = self.lock()?;
        let collection = collection_mut(&mut stores, link_store, collection_id)?;
        let row = collection
            .rows
            .get_mut(&row_id)
            .ok_or_else(|| FeedError::Transport(format!("404: no row {row_id}")))?;
        if row.version != version {
            return Err(FeedError::Transport(format!(
                "409: stale edit link, row {row_id} is at version {}",
                row.version
            )));
        }

        row.version += 1;
        row.document = stamp(document, link_store, collection_id, row_id, row.version);
        info!(%collection_id, row_id, version = row.version, "Updated");
        Ok(row.document.clone())
    }
}
