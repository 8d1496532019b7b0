//! HTTP accessor tests against a mock remote API

use goal_sync::{Collection, NotionConfig, NotionStore, PageStore, PropertyMap, SyncError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer) -> NotionStore {
    NotionStore::new(
        NotionConfig::new("secret-token", "goals-db", "todos-db").with_base_url(server.uri()),
    )
    .unwrap()
}

fn page_json(id: &str, title_prop: &str, title: &str) -> serde_json::Value {
    json!({
        "object": "page",
        "id": id,
        "properties": {
            title_prop: {"title": [{"plain_text": title, "text": {"content": title}}]}
        }
    })
}

#[tokio::test]
async fn fetch_parses_a_page_and_sends_auth_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pages/g-1"))
        .and(header("Authorization", "Bearer secret-token"))
        .and(header("Notion-Version", "2022-06-28"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json("g-1", "Name", "Machine Learning Study")))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let doc = store.fetch(Collection::Goals, "g-1").await.unwrap();
    assert_eq!(doc.id, "g-1");
    assert_eq!(doc.title_text("Name").as_deref(), Some("Machine Learning Study"));
}

#[tokio::test]
async fn missing_page_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pages/gone"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Could not find page"})),
        )
        .mount(&server)
        .await;

    let store = store_for(&server);
    let err = store.fetch(Collection::Goals, "gone").await.unwrap_err();
    assert!(matches!(err, SyncError::NotFound(_)));
}

#[tokio::test]
async fn validation_and_auth_failures_map_to_their_error_kinds() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/pages/bad-props"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"message": "Invalid select option"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pages/locked"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "API token is invalid"})))
        .mount(&server)
        .await;

    let store = store_for(&server);

    let err = store
        .patch(Collection::Todos, "bad-props", PropertyMap::new())
        .await
        .unwrap_err();
    match err {
        SyncError::Validation(message) => assert!(message.contains("Invalid select option")),
        other => panic!("expected Validation, got {:?}", other),
    }

    let err = store.fetch(Collection::Goals, "locked").await.unwrap_err();
    assert!(matches!(err, SyncError::Auth(_)));
}

#[tokio::test]
async fn rate_limited_request_is_retried_until_success() {
    let server = MockServer::start().await;
    // first attempt answers 429; once consumed, the success mock takes over
    Mock::given(method("GET"))
        .and(path("/pages/g-1"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "0")
                .set_body_json(json!({"message": "rate limited"})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pages/g-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json("g-1", "Name", "Goal")))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let doc = store.fetch(Collection::Goals, "g-1").await.unwrap();
    assert_eq!(doc.id, "g-1");
}

#[tokio::test]
async fn server_error_is_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pages/g-1"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({"message": "bad gateway"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pages/g-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json("g-1", "Name", "Goal")))
        .mount(&server)
        .await;

    let store = store_for(&server);
    assert!(store.fetch(Collection::Goals, "g-1").await.is_ok());
}

#[tokio::test]
async fn list_all_follows_cursor_pagination() {
    let server = MockServer::start().await;
    // first page, consumed once
    Mock::given(method("POST"))
        .and(path("/databases/todos-db/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [page_json("t-1", "Task", "First")],
            "has_more": true,
            "next_cursor": "c2"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    // second page, must be asked for with the cursor
    Mock::given(method("POST"))
        .and(path("/databases/todos-db/query"))
        .and(body_partial_json(json!({"start_cursor": "c2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [page_json("t-2", "Task", "Second")],
            "has_more": false,
            "next_cursor": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let todos = store.list_all(Collection::Todos).await.unwrap();
    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0].id, "t-1");
    assert_eq!(todos[1].id, "t-2");
}

#[tokio::test]
async fn find_by_title_queries_the_title_property() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/databases/goals-db/query"))
        .and(body_partial_json(json!({
            "filter": {"property": "Name", "title": {"equals": "Athletics & Health"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [page_json("g-2", "Name", "Athletics & Health")],
            "has_more": false,
            "next_cursor": null
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let goal = store
        .find_by_title(Collection::Goals, "Athletics & Health")
        .await
        .unwrap();
    assert_eq!(goal.id, "g-2");
}

#[tokio::test]
async fn find_by_title_with_no_match_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/databases/goals-db/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [],
            "has_more": false,
            "next_cursor": null
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let err = store
        .find_by_title(Collection::Goals, "Nonexistent")
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::NotFound(_)));
}

#[tokio::test]
async fn create_sends_the_parent_database() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pages"))
        .and(body_partial_json(json!({"parent": {"database_id": "todos-db"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json("t-new", "Task", "Created")))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let mut properties = PropertyMap::new();
    properties.insert(
        "Task".to_string(),
        goal_sync::model::property::title("Created"),
    );
    let doc = store.create(Collection::Todos, properties).await.unwrap();
    assert_eq!(doc.id, "t-new");
}

#[tokio::test]
async fn schema_patch_targets_both_databases() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/databases/goals-db"))
        .and(body_partial_json(json!({
            "properties": {"Related Todos": {"relation": {"database_id": "todos-db"}}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"object": "database"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/databases/todos-db"))
        .and(body_partial_json(json!({
            "properties": {"Related Goals": {"relation": {"database_id": "goals-db"}}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"object": "database"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.ensure_relation_properties().await.unwrap();
}
