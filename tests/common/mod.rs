#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use rusty_library_catalog::adapters::in_memory::{CatalogStore, sample_books};
use rusty_library_catalog::api::handlers::AppState;
use rusty_library_catalog::api::router::create_app as create_http_app;
use rusty_library_catalog::application::catalog::ServiceDependencies;
use rusty_library_catalog::domain::Book;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::normalize_path::NormalizePath;

/// テスト対象のHTTPサービス（末尾スラッシュ正規化込み）
pub type App = NormalizePath<Router>;

/// インメモリストアを使ったサービス依存関係
pub fn create_deps(books: Vec<Book>) -> ServiceDependencies {
    ServiceDependencies::new(Arc::new(CatalogStore::with_books(books)))
}

/// サンプル蔵書（3冊、2番は貸出中）で初期化したルーター
pub fn create_seeded_app() -> App {
    create_app(sample_books())
}

/// 指定した蔵書で初期化したルーター
pub fn create_app(books: Vec<Book>) -> App {
    let app_state = Arc::new(AppState {
        service_deps: create_deps(books),
    });
    create_http_app(app_state)
}

/// リクエストを送り、ステータスとJSONボディを返す
pub async fn send(app: &App, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send_request(app, request).await
}

/// 組み立て済みのリクエストを送る
pub async fn send_request(app: &App, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}
