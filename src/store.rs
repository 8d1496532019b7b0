use crate::error::SyncResult;
use crate::model::{Document, fields};
use async_trait::async_trait;
use std::fmt;

/// A named property map as sent to the remote store.
///
/// Values use the remote wire shape (see `model::property` for builders).
pub type PropertyMap = serde_json::Map<String, serde_json::Value>;

/// The two remote collections this tool operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Goals,
    Todos,
}

impl Collection {
    /// Name of the title property in this collection's schema.
    pub fn title_property(&self) -> &'static str {
        match self {
            Collection::Goals => fields::GOAL_TITLE,
            Collection::Todos => fields::TODO_TITLE,
        }
    }

    /// Name of the relation property pointing at the opposite collection.
    pub fn relation_property(&self) -> &'static str {
        match self {
            Collection::Goals => fields::GOAL_RELATED_TODOS,
            Collection::Todos => fields::TODO_RELATED_GOALS,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Goals => write!(f, "Goals"),
            Collection::Todos => write!(f, "Todos"),
        }
    }
}

/// Call surface for the remote document store.
///
/// Writes are full-replace of each named property value; the remote API has
/// no field-level append primitive, which is what forces the
/// fetch-then-computed-patch shape in the reconciler.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Fetch a document by its opaque identifier.
    async fn fetch(&self, collection: Collection, id: &str) -> SyncResult<Document>;

    /// Resolve a document by exact title match, first match wins.
    ///
    /// Duplicate titles are not disambiguated; callers that already hold a
    /// stable identifier should use `fetch` instead.
    async fn find_by_title(&self, collection: Collection, title: &str) -> SyncResult<Document>;

    /// Create a new document in the collection.
    async fn create(&self, collection: Collection, properties: PropertyMap) -> SyncResult<Document>;

    /// Replace the named property values on an existing document.
    async fn patch(&self, collection: Collection, id: &str, properties: PropertyMap)
    -> SyncResult<()>;

    /// Enumerate every document in the collection, following pagination.
    async fn list_all(&self, collection: Collection) -> SyncResult<Vec<Document>>;
}
