//! Remote loader against an in-process HTTP server serving the fixture files.

mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use riggs_core::loader::{self, Collection, DatasetSource};
use riggs_core::{Catalog, LoadErrorKind};

type Files = Arc<HashMap<String, String>>;

async fn serve_file(Path(name): Path<String>, State(files): State<Files>) -> impl IntoResponse {
    match files.get(&name) {
        Some(body) => (StatusCode::OK, body.clone()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}

/// Serves the fixture under `/api/<collection>.json`, minus `skip`, with
/// `overrides` replacing individual bodies.
async fn start_server(skip: Option<Collection>, overrides: &[(Collection, &str)]) -> String {
    let mut files: HashMap<String, String> = common::fixture()
        .into_iter()
        .filter(|(c, _)| Some(*c) != skip)
        .map(|(c, v)| (c.file_name(), v.to_string()))
        .collect();
    for (c, body) in overrides {
        files.insert(c.file_name(), body.to_string());
    }

    let app = Router::new()
        .route("/api/:name", get(serve_file))
        .with_state(Arc::new(files));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api/", addr)
}

fn source(base_url: String) -> DatasetSource {
    DatasetSource::remote(base_url, Duration::from_secs(5), "riggs-test/0.1").unwrap()
}

#[tokio::test]
async fn remote_load_builds_catalog() {
    let base = start_server(None, &[]).await;
    let raw = loader::load_all(&source(base)).await.unwrap();
    assert_eq!(raw.regions.len(), 2);
    assert_eq!(raw.channels.len(), 8);

    let catalog = Catalog::build("AMER", raw).unwrap();
    assert_eq!(catalog.countries().len(), 3);
    assert_eq!(catalog.countries()[0].name, "Brazil");
}

#[tokio::test]
async fn http_error_names_the_collection() {
    let base = start_server(Some(Collection::Timezones), &[]).await;
    let err = loader::load_all(&source(base)).await.unwrap_err();
    assert_eq!(err.collection, Collection::Timezones);
    match err.kind {
        LoadErrorKind::Network(msg) => assert!(msg.contains("404"), "{msg}"),
        other => panic!("expected network error, got {other:?}"),
    }
}

#[tokio::test]
async fn bad_json_is_a_parse_error() {
    let base = start_server(None, &[(Collection::Categories, "[{\"id\": 1}]")]).await;
    let err = loader::load_all(&source(base)).await.unwrap_err();
    assert_eq!(err.collection, Collection::Categories);
    assert!(matches!(err.kind, LoadErrorKind::Parse(_)));
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    // Bind and drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = loader::load_all(&source(format!("http://{}", addr)))
        .await
        .unwrap_err();
    assert!(matches!(err.kind, LoadErrorKind::Network(_)));
}
