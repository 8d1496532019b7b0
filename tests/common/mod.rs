//! Common test utilities for integration tests

use async_trait::async_trait;
use goal_sync::model::{fields, property};
use goal_sync::{Collection, Document, PageStore, PropertyMap, SyncError, SyncResult};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// In-memory stand-in for the remote store.
///
/// Mirrors the remote write semantics: `patch` replaces each named property
/// value wholesale. Every patch is logged so tests can assert zero-write
/// idempotence, and individual documents can be armed to fail their next
/// patch to exercise partial-link reporting.
#[derive(Default)]
pub struct MemoryStore {
    docs: Mutex<HashMap<(Collection, String), Document>>,
    counter: Mutex<u32>,
    patch_log: Mutex<Vec<(Collection, String)>>,
    failing_patches: Mutex<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, collection: Collection, doc: Document) {
        self.docs
            .lock()
            .unwrap()
            .insert((collection, doc.id.clone()), doc);
    }

    /// Seed a goal with the given title and no relations.
    pub fn seed_goal(&self, id: &str, title: &str) {
        let mut properties = PropertyMap::new();
        properties.insert(fields::GOAL_TITLE.to_string(), property::title(title));
        self.insert(Collection::Goals, Document::new(id, properties));
    }

    /// Seed a todo with the given title and priority and no relations.
    pub fn seed_todo(&self, id: &str, title: &str, priority: &str) {
        let mut properties = PropertyMap::new();
        properties.insert(fields::TODO_TITLE.to_string(), property::title(title));
        properties.insert(fields::TODO_PRIORITY.to_string(), property::select(priority));
        self.insert(Collection::Todos, Document::new(id, properties));
    }

    /// Snapshot a stored document, panicking when absent.
    pub fn document(&self, collection: Collection, id: &str) -> Document {
        self.docs
            .lock()
            .unwrap()
            .get(&(collection, id.to_string()))
            .cloned()
            .unwrap_or_else(|| panic!("no {} document with id {}", collection, id))
    }

    pub fn patch_count(&self) -> usize {
        self.patch_log.lock().unwrap().len()
    }

    /// Every patch on this document id will fail with a connection error.
    pub fn fail_patches_on(&self, id: &str) {
        self.failing_patches.lock().unwrap().insert(id.to_string());
    }
}

#[async_trait]
impl PageStore for MemoryStore {
    async fn fetch(&self, collection: Collection, id: &str) -> SyncResult<Document> {
        self.docs
            .lock()
            .unwrap()
            .get(&(collection, id.to_string()))
            .cloned()
            .ok_or_else(|| SyncError::NotFound(format!("no {} document with id {}", collection, id)))
    }

    async fn find_by_title(&self, collection: Collection, title: &str) -> SyncResult<Document> {
        let docs = self.docs.lock().unwrap();
        let mut matches: Vec<&Document> = docs
            .iter()
            .filter(|((c, _), doc)| {
                *c == collection
                    && doc.title_text(collection.title_property()).as_deref() == Some(title)
            })
            .map(|(_, doc)| doc)
            .collect();
        // first match wins, deterministically
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        matches.first().map(|doc| (*doc).clone()).ok_or_else(|| {
            SyncError::NotFound(format!("no {} document titled '{}'", collection, title))
        })
    }

    async fn create(&self, collection: Collection, properties: PropertyMap) -> SyncResult<Document> {
        let id = {
            let mut counter = self.counter.lock().unwrap();
            *counter += 1;
            format!("page-{}", counter)
        };
        let doc = Document::new(id, properties);
        self.insert(collection, doc.clone());
        Ok(doc)
    }

    async fn patch(
        &self,
        collection: Collection,
        id: &str,
        properties: PropertyMap,
    ) -> SyncResult<()> {
        if self.failing_patches.lock().unwrap().contains(id) {
            return Err(SyncError::Connection("connection reset by peer".to_string()));
        }
        let mut docs = self.docs.lock().unwrap();
        let doc = docs
            .get_mut(&(collection, id.to_string()))
            .ok_or_else(|| SyncError::NotFound(format!("no {} document with id {}", collection, id)))?;
        for (name, value) in properties {
            doc.properties.insert(name, value);
        }
        self.patch_log.lock().unwrap().push((collection, id.to_string()));
        Ok(())
    }

    async fn list_all(&self, collection: Collection) -> SyncResult<Vec<Document>> {
        let docs = self.docs.lock().unwrap();
        let mut all: Vec<Document> = docs
            .iter()
            .filter(|((c, _), _)| *c == collection)
            .map(|(_, doc)| doc.clone())
            .collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }
}
