//! Hosted-store implementation of `PageStore`
//!
//! Talks to the Notion-shaped HTTP API: pages for documents, database
//! queries for title lookup and full enumeration. Rate limiting and
//! retry/backoff live in the `http` submodule; callers above this layer
//! see only success or a terminal `SyncError`.

mod http;
mod schema;

use crate::error::{SyncError, SyncResult};
use crate::model::Document;
use crate::store::{Collection, PageStore, PropertyMap};
use async_trait::async_trait;
use http::Http;
use serde::Deserialize;
use serde_json::{Value, json};

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";

#[derive(Debug, Clone)]
pub struct NotionConfig {
    pub api_token: String,
    pub goals_database_id: String,
    pub todos_database_id: String,
    pub base_url: String,
}

impl NotionConfig {
    pub fn new(
        api_token: impl Into<String>,
        goals_database_id: impl Into<String>,
        todos_database_id: impl Into<String>,
    ) -> Self {
        Self {
            api_token: api_token.into(),
            goals_database_id: goals_database_id.into(),
            todos_database_id: todos_database_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

pub struct NotionStore {
    http: Http,
    goals_database_id: String,
    todos_database_id: String,
}

impl NotionStore {
    pub fn new(config: NotionConfig) -> SyncResult<Self> {
        Ok(Self {
            http: Http::new(config.base_url, config.api_token)?,
            goals_database_id: config.goals_database_id,
            todos_database_id: config.todos_database_id,
        })
    }

    pub(crate) fn database_id(&self, collection: Collection) -> &str {
        match collection {
            Collection::Goals => &self.goals_database_id,
            Collection::Todos => &self.todos_database_id,
        }
    }

    pub(crate) fn http(&self) -> &Http {
        &self.http
    }

    async fn query_page(
        &self,
        collection: Collection,
        body: Value,
    ) -> SyncResult<QueryResponse> {
        let path = format!("databases/{}/query", self.database_id(collection));
        let response = self.http.post(&path, &body).await?;
        serde_json::from_value(response)
            .map_err(|err| SyncError::Malformed(format!("query response: {}", err)))
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<Document>,
    #[serde(default)]
    has_more: bool,
    next_cursor: Option<String>,
}

#[async_trait]
impl PageStore for NotionStore {
    async fn fetch(&self, _collection: Collection, id: &str) -> SyncResult<Document> {
        let response = self.http.get(&format!("pages/{}", id)).await?;
        serde_json::from_value(response)
            .map_err(|err| SyncError::Malformed(format!("page {}: {}", id, err)))
    }

    async fn find_by_title(&self, collection: Collection, title: &str) -> SyncResult<Document> {
        let body = json!({
            "page_size": 1,
            "filter": {
                "property": collection.title_property(),
                "title": { "equals": title }
            }
        });
        let page = self.query_page(collection, body).await?;
        page.results.into_iter().next().ok_or_else(|| {
            SyncError::NotFound(format!("no {} document titled '{}'", collection, title))
        })
    }

    async fn create(&self, collection: Collection, properties: PropertyMap) -> SyncResult<Document> {
        let body = json!({
            "parent": { "database_id": self.database_id(collection) },
            "properties": Value::Object(properties)
        });
        let response = self.http.post("pages", &body).await?;
        serde_json::from_value(response)
            .map_err(|err| SyncError::Malformed(format!("created page: {}", err)))
    }

    async fn patch(
        &self,
        _collection: Collection,
        id: &str,
        properties: PropertyMap,
    ) -> SyncResult<()> {
        let body = json!({ "properties": Value::Object(properties) });
        self.http.patch(&format!("pages/{}", id), &body).await?;
        Ok(())
    }

    async fn list_all(&self, collection: Collection) -> SyncResult<Vec<Document>> {
        let mut documents = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({ "page_size": 100 });
            if let Some(ref cursor) = cursor {
                body["start_cursor"] = json!(cursor);
            }
            let page = self.query_page(collection, body).await?;
            documents.extend(page.results);

            match (page.has_more, page.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        Ok(documents)
    }
}
