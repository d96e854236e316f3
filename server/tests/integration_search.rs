use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use server::{build_state, router, AppOptions};
use std::fs;
use tempfile::tempdir;
use tower::ServiceExt;

fn build_tiny_corpus(dir: &std::path::Path) {
    fs::write(dir.join("0.txt"), "Rust is great. Rust systems programming with rust.").unwrap();
    fs::write(dir.join("1.txt"), "Learning rust and cooking pasta.").unwrap();
    fs::write(dir.join("2.txt"), "Gardening tips for tomatoes.").unwrap();
    fs::write(dir.join("ignored.bin"), "rust rust rust").unwrap();
}

fn app_with_corpus(dir: &std::path::Path) -> Router {
    let options = AppOptions {
        corpus_dir: Some(dir.to_path_buf()),
        extensions: vec!["txt".into()],
        admin_token: Some("secret".into()),
        ..AppOptions::default()
    };
    router(build_state(&options).unwrap())
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut req = Request::post(uri).header("content-type", "application/json");
    if let Some(t) = token {
        req = req.header("X-ADMIN-TOKEN", t);
    }
    req.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    build_tiny_corpus(dir.path());
    let app = app_with_corpus(dir.path());

    let (status, json) = call(app, get("/search?q=rust&k=5")).await;
    assert_eq!(status, StatusCode::OK);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert!(arr[0]["name"].as_str().unwrap().ends_with("0.txt"));
    assert!(arr[1]["name"].as_str().unwrap().ends_with("1.txt"));
    assert!(arr[0]["similarity"].as_f64().unwrap() >= arr[1]["similarity"].as_f64().unwrap());
    assert!(arr[0]["snippet"].as_str().unwrap().contains("<em>Rust</em>"));
}

#[tokio::test]
async fn empty_query_is_a_bad_request() {
    let dir = tempdir().unwrap();
    build_tiny_corpus(dir.path());
    let (status, _) = call(app_with_corpus(dir.path()), get("/search?q=the")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn adding_documents_requires_the_admin_token() {
    let dir = tempdir().unwrap();
    build_tiny_corpus(dir.path());
    let app = app_with_corpus(dir.path());
    let doc = json!({ "name": "new", "text": "Tomatoes need sun and water" });

    let (status, _) = call(app.clone(), post_json("/documents", doc.clone(), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, json) = call(app.clone(), post_json("/documents", doc.clone(), Some("secret"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["report"]["term_count"], 4);
    let doc_id = json["doc_id"].as_str().unwrap().to_string();

    let (status, _) = call(app.clone(), post_json("/documents", doc, Some("secret"))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, json) = call(app.clone(), get(&format!("/doc/{doc_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "new");

    let (_, json) = call(app, get("/search?q=tomatoes")).await;
    assert_eq!(json["total_hits"], 2);
}

#[tokio::test]
async fn analyze_previews_without_committing() {
    let dir = tempdir().unwrap();
    build_tiny_corpus(dir.path());
    let app = app_with_corpus(dir.path());

    let doc = json!({ "name": "preview", "text": "Le chat est sur le tapis" });
    let (status, json) = call(app.clone(), post_json("/documents/analyze", doc, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["report"]["processed_lang"], "fr");

    let (_, json) = call(app, get("/report")).await;
    assert_eq!(json["documents"], 3);
    assert_eq!(json["dimensions"], json["terms"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn searches_proceed_while_documents_are_added() {
    let dir = tempdir().unwrap();
    build_tiny_corpus(dir.path());
    let app = app_with_corpus(dir.path());

    let mut adds = Vec::new();
    for i in 0..8 {
        let doc = json!({ "name": format!("garden-{i}"), "text": format!("Tomatoes and basil number {i} grow in garden bed{i}") });
        adds.push(tokio::spawn(call(app.clone(), post_json("/documents", doc, Some("secret")))));
    }
    let mut searches = Vec::new();
    for _ in 0..8 {
        searches.push(tokio::spawn(call(app.clone(), get("/search?q=tomatoes"))));
    }
    for handle in adds {
        let (status, _) = handle.await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
    }
    for handle in searches {
        let (status, json) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert!(json["total_hits"].as_u64().unwrap() >= 1);
    }

    let (_, json) = call(app, get("/report")).await;
    assert_eq!(json["documents"], 11);
}
