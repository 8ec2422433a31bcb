//! Shared harness: serves the full application over an in-memory store on
//! an ephemeral port.

#![allow(dead_code)]

use knowbase_api::{app, AppState, ServerConfig};
use knowbase_core::memory::MemoryStore;
use serde_json::{json, Value};

pub struct TestApp {
    pub base: String,
    pub store: MemoryStore,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// POST `body` to `path` and return the parsed response body.
    pub async fn create(&self, path: &str, body: Value) -> Value {
        let resp = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201, "create at {} failed", path);
        resp.json().await.unwrap()
    }

    pub async fn create_tag(&self, name: &str) -> Value {
        self.create("/api/tags", json!({ "name": name })).await
    }

    pub async fn create_category(&self, name: &str, parent_id: Option<&str>) -> Value {
        self.create("/api/categories", json!({ "name": name, "parentId": parent_id }))
            .await
    }

    pub async fn create_article(&self, title: &str, extra: Value) -> Value {
        let mut body = json!({ "title": title, "content": format!("About {}", title) });
        if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                body.insert(k.clone(), v.clone());
            }
        }
        self.create("/api/articles", body).await
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(ServerConfig::default()).await
}

pub async fn spawn_app_with(config: ServerConfig) -> TestApp {
    let store = MemoryStore::new();
    let router = app(AppState::from_store(store.clone()), &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp {
        base: format!("http://{}", addr),
        store,
        client: reqwest::Client::new(),
    }
}
