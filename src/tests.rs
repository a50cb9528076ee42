//! Integration tests for the Clipio backend.

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::auth::mint_session_token;
use crate::config::Config;
use crate::db::{init_database, Repository};
use crate::models::COLOR_PALETTE;
use crate::tagging::KeywordSuggester;
use crate::{create_router, AppState};

const TEST_SECRET: &str = "test-session-secret";

static PALETTE: Lazy<HashSet<&'static str>> = Lazy::new(|| COLOR_PALETTE.iter().copied().collect());

/// Test fixture for integration tests.
struct TestFixture {
    base_url: String,
    secret: Option<String>,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_secret(Some(TEST_SECRET.to_string())).await
    }

    async fn with_secret(secret: Option<String>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Initialize database
        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool));

        // Create config
        let config = Config {
            session_secret: secret.clone(),
            db_path,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
        };

        let state = AppState {
            repo,
            suggester: Arc::new(KeywordSuggester),
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            base_url,
            secret,
            _temp_dir: temp_dir,
        }
    }

    /// Build a client authenticated as the given user.
    fn client_for(&self, user_id: &str) -> Client {
        let mut headers = reqwest::header::HeaderMap::new();
        match &self.secret {
            Some(secret) => {
                let token = mint_session_token(secret, user_id);
                headers.insert("x-session-token", token.parse().unwrap());
            }
            None => {
                headers.insert("x-user-id", user_id.parse().unwrap());
            }
        }
        Client::builder().default_headers(headers).build().unwrap()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn create_asset(fixture: &TestFixture, client: &Client, body: Value) -> Value {
    let resp = client
        .post(fixture.url("/api/assets"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    body["data"].clone()
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = Client::new()
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_missing_session_is_unauthorized() {
    let fixture = TestFixture::new().await;

    let resp = Client::new()
        .get(fixture.url("/api/assets"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_forged_session_is_unauthorized() {
    let fixture = TestFixture::new().await;

    let forged = mint_session_token("wrong-secret", "user-1");
    let resp = Client::new()
        .get(fixture.url("/api/assets"))
        .header("x-session-token", forged)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_dev_mode_trusts_user_header() {
    let fixture = TestFixture::with_secret(None).await;
    let client = fixture.client_for("dev-user");

    let resp = client.get(fixture.url("/api/assets")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    // But a request with no user header at all is still rejected
    let resp = Client::new()
        .get(fixture.url("/api/assets"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_create_asset_requires_title_and_url() {
    let fixture = TestFixture::new().await;
    let client = fixture.client_for("user-1");

    let resp = client
        .post(fixture.url("/api/assets"))
        .json(&json!({ "url": "https://cdn.example.com/x.png" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let resp = client
        .post(fixture.url("/api/assets"))
        .json(&json!({ "title": "Untitled" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_create_asset_generates_tags_and_thumbnail() {
    let fixture = TestFixture::new().await;
    let client = fixture.client_for("user-1");

    let asset = create_asset(
        &fixture,
        &client,
        json!({
            "title": "Company Logo Final",
            "url": "https://cdn.example.com/logo.png",
            "tags": ["  Brand ", "brand"]
        }),
    )
    .await;

    // Kind inferred from the URL, thumbnail is the source URL
    assert_eq!(asset["file_type"], "image");
    assert_eq!(asset["thumbnail_url"], "https://cdn.example.com/logo.png");
    // User tags normalized, suggested tags from the keyword heuristic
    assert_eq!(asset["tags"], json!(["brand"]));
    assert_eq!(asset["ai_tags"], json!(["logo", "image"]));
}

#[tokio::test]
async fn test_list_assets_newest_first_and_user_scoped() {
    let fixture = TestFixture::new().await;
    let client = fixture.client_for("user-1");

    create_asset(
        &fixture,
        &client,
        json!({ "title": "Older", "url": "https://cdn.example.com/a.png" }),
    )
    .await;
    tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
    create_asset(
        &fixture,
        &client,
        json!({ "title": "Newer", "url": "https://cdn.example.com/b.png" }),
    )
    .await;

    let resp = client.get(fixture.url("/api/assets")).send().await.unwrap();
    let body: Value = resp.json().await.unwrap();
    let assets = body["data"].as_array().unwrap();
    assert_eq!(assets.len(), 2);
    assert_eq!(assets[0]["title"], "Newer");
    assert_eq!(assets[1]["title"], "Older");

    // Another user sees none of them
    let other = fixture.client_for("user-2");
    let resp = other.get(fixture.url("/api/assets")).send().await.unwrap();
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_assets_search_matches_title_and_tags() {
    let fixture = TestFixture::new().await;
    let client = fixture.client_for("user-1");

    create_asset(
        &fixture,
        &client,
        json!({ "title": "Hero Banner", "url": "https://cdn.example.com/a.png" }),
    )
    .await;
    create_asset(
        &fixture,
        &client,
        json!({
            "title": "Mockup",
            "url": "https://cdn.example.com/b.png",
            "tags": ["hero"]
        }),
    )
    .await;
    create_asset(
        &fixture,
        &client,
        json!({ "title": "Unrelated", "url": "https://cdn.example.com/c.png" }),
    )
    .await;

    let resp = client
        .get(fixture.url("/api/assets?search=hero"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let assets = body["data"].as_array().unwrap();
    assert_eq!(assets.len(), 2);
}

#[tokio::test]
async fn test_list_assets_pagination() {
    let fixture = TestFixture::new().await;
    let client = fixture.client_for("user-1");

    for i in 0..5 {
        create_asset(
            &fixture,
            &client,
            json!({
                "title": format!("Asset {}", i),
                "url": format!("https://cdn.example.com/{}.png", i)
            }),
        )
        .await;
        tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
    }

    let resp = client
        .get(fixture.url("/api/assets?limit=2&offset=2"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let assets = body["data"].as_array().unwrap();
    assert_eq!(assets.len(), 2);
    // Newest first: offset 2 of 4..0 is 2, 1
    assert_eq!(assets[0]["title"], "Asset 2");
    assert_eq!(assets[1]["title"], "Asset 1");
}

#[tokio::test]
async fn test_collection_crud_and_asset_count() {
    let fixture = TestFixture::new().await;
    let client = fixture.client_for("user-1");

    // Name is required
    let resp = client
        .post(fixture.url("/api/collections"))
        .json(&json!({ "name": "  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Created without a color, one is picked from the palette
    let resp = client
        .post(fixture.url("/api/collections"))
        .json(&json!({ "name": "Marketing" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let collection = body["data"].clone();
    let color = collection["color"].as_str().unwrap();
    assert!(PALETTE.contains(color));
    let collection_id = collection["id"].as_str().unwrap().to_string();

    // Two assets inside, one outside
    for i in 0..2 {
        create_asset(
            &fixture,
            &client,
            json!({
                "title": format!("In collection {}", i),
                "url": "https://cdn.example.com/a.png",
                "collection_id": collection_id
            }),
        )
        .await;
    }
    create_asset(
        &fixture,
        &client,
        json!({ "title": "Loose", "url": "https://cdn.example.com/b.png" }),
    )
    .await;

    let resp = client
        .get(fixture.url("/api/collections"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let collections = body["data"].as_array().unwrap();
    assert_eq!(collections.len(), 1);
    assert_eq!(collections[0]["asset_count"], 2);

    // Filtering assets by collection
    let resp = client
        .get(fixture.url(&format!("/api/assets?collection_id={}", collection_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Update
    let resp = client
        .put(fixture.url("/api/collections"))
        .json(&json!({
            "id": collection_id,
            "name": "Campaigns",
            "is_public": true
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Campaigns");
    assert_eq!(body["data"]["is_public"], true);

    // Public filter now matches it
    let resp = client
        .get(fixture.url("/api/collections?public=true"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_collection_ownership_checks() {
    let fixture = TestFixture::new().await;
    let owner = fixture.client_for("user-1");
    let intruder = fixture.client_for("user-2");

    let resp = owner
        .post(fixture.url("/api/collections"))
        .json(&json!({ "name": "Brand" }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let collection_id = body["data"]["id"].as_str().unwrap().to_string();

    // Someone else's update attempt is forbidden
    let resp = intruder
        .put(fixture.url("/api/collections"))
        .json(&json!({ "id": collection_id, "name": "Stolen" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    // And their delete attempt too
    let resp = intruder
        .delete(fixture.url(&format!("/api/collections?id={}", collection_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // Unknown id is not found
    let resp = owner
        .put(fixture.url("/api/collections"))
        .json(&json!({ "id": "does-not-exist", "name": "X" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_delete_collection_requires_id_and_cascades() {
    let fixture = TestFixture::new().await;
    let client = fixture.client_for("user-1");

    // Missing id is a validation error
    let resp = client
        .delete(fixture.url("/api/collections"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = client
        .post(fixture.url("/api/collections"))
        .json(&json!({ "name": "Design" }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let collection_id = body["data"]["id"].as_str().unwrap().to_string();

    create_asset(
        &fixture,
        &client,
        json!({
            "title": "Wireframe",
            "url": "https://cdn.example.com/w.pdf",
            "collection_id": collection_id
        }),
    )
    .await;
    create_asset(
        &fixture,
        &client,
        json!({ "title": "Survivor", "url": "https://cdn.example.com/s.png" }),
    )
    .await;

    let resp = client
        .delete(fixture.url(&format!("/api/collections?id={}", collection_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // The member asset is gone with it; the loose asset survives
    let resp = client.get(fixture.url("/api/assets")).send().await.unwrap();
    let body: Value = resp.json().await.unwrap();
    let assets = body["data"].as_array().unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0]["title"], "Survivor");

    let resp = client
        .get(fixture.url("/api/collections"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());
}
