use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use blog_api::{
    blog_interface::create_blog_router,
    infrastructure::{DatabaseInterface, SqliteDatabase},
    models::{Comment, Post},
    services::BlogService,
};

struct TestApp {
    router: Router,
    database: Arc<dyn DatabaseInterface>,
}

async fn test_app() -> TestApp {
    let database: Arc<dyn DatabaseInterface> =
        Arc::new(SqliteDatabase::new_in_memory().await.unwrap());
    let router = create_blog_router(BlogService::new(database.clone()));
    TestApp { router, database }
}

struct TestResponse {
    status: StatusCode,
    content_type: String,
    body: Vec<u8>,
}

impl TestResponse {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

async fn send(app: &TestApp, method: &str, uri: &str, body: Option<&str>) -> TestResponse {
    let mut request = Request::builder().method(method).uri(uri);
    if body.is_some() {
        request = request.header(header::CONTENT_TYPE, "application/json");
    }
    let request = request
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    TestResponse {
        status,
        content_type,
        body,
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app().await;
    let response = send(&app, "GET", "/", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.content_type.starts_with("text/plain"));
    assert_eq!(response.text(), "Blog API is running");
}

#[tokio::test]
async fn test_end_to_end_moderation_scenario() {
    let app = test_app().await;

    let response = send(&app, "POST", "/post/create", Some(r#"{"title":"A","content":"B"}"#)).await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["message"], "Post created");
    let post: Post = serde_json::from_value(body["post"].clone()).unwrap();
    assert_eq!(post.title.as_deref(), Some("A"));
    assert_eq!(post.content.as_deref(), Some("B"));
    let post_id = post.id.clone();

    let response = send(&app, "GET", "/posts", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let posts: Vec<Post> = serde_json::from_slice(&response.body).unwrap();
    assert!(posts.iter().any(|p| p.id == post_id && p.title.as_deref() == Some("A")));

    let comment_body = json!({ "postId": post_id, "username": "u", "message": "hi" }).to_string();
    let response = send(&app, "POST", "/comment/create", Some(&comment_body)).await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["message"], "Comment submitted for review");
    assert_eq!(body["comment"]["approved"], json!(false));
    let comment: Comment = serde_json::from_value(body["comment"].clone()).unwrap();

    let response = send(&app, "GET", "/comments/pending", None).await;
    let pending: Vec<Comment> = serde_json::from_slice(&response.body).unwrap();
    assert!(pending.iter().any(|c| c.id == comment.id));

    let response = send(&app, "PUT", &format!("/comment/approve/{}", comment.id), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({ "message": "Comment Approved", "id": comment.id })
    );

    let response = send(&app, "GET", &format!("/comments/{}", post_id), None).await;
    assert_eq!(response.status, StatusCode::OK);
    let approved: Vec<Comment> = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].id, comment.id);
    assert!(approved[0].approved);

    let response = send(&app, "GET", "/comments/pending", None).await;
    let pending: Vec<Comment> = serde_json::from_slice(&response.body).unwrap();
    assert!(pending.iter().all(|c| c.id != comment.id));
}

#[tokio::test]
async fn test_posts_listed_newest_first() {
    let app = test_app().await;
    for (title, created) in [
        ("first", "2024-01-01T00:00:00Z"),
        ("third", "2024-03-01T00:00:00Z"),
        ("second", "2024-02-01T00:00:00Z"),
    ] {
        let body = json!({ "title": title, "createdAt": created }).to_string();
        let response = send(&app, "POST", "/post/create", Some(&body)).await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let response = send(&app, "GET", "/posts", None).await;
    let body = response.json();
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
    assert_eq!(body[0]["createdAt"], "2024-03-01T00:00:00.000Z");
}

#[tokio::test]
async fn test_client_supplied_approved_is_ignored() {
    let app = test_app().await;
    let response = send(
        &app,
        "POST",
        "/comment/create",
        Some(r#"{"postId":"p1","message":"sneaky","approved":true}"#),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["comment"]["approved"], json!(false));

    let response = send(&app, "GET", "/comments/p1", None).await;
    assert_eq!(response.json(), json!([]));

    let response = send(&app, "GET", "/comments/pending", None).await;
    assert_eq!(response.json().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_approve_is_idempotent_and_tolerates_unknown_ids() {
    let app = test_app().await;
    let response = send(&app, "POST", "/comment/create", Some(r#"{"postId":"p1"}"#)).await;
    let id = response.json()["comment"]["_id"].as_str().unwrap().to_string();

    for _ in 0..2 {
        let response = send(&app, "PUT", &format!("/comment/approve/{}", id), None).await;
        assert_eq!(response.status, StatusCode::OK);
    }
    let response = send(&app, "GET", "/comments/p1", None).await;
    assert_eq!(response.json().as_array().unwrap().len(), 1);

    let response = send(&app, "PUT", "/comment/approve/65e1904e0000000000000001", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["id"], "65e1904e0000000000000001");
}

#[tokio::test]
async fn test_malformed_approve_id_is_500() {
    let app = test_app().await;
    let response = send(&app, "PUT", "/comment/approve/not-an-id", None).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.content_type.starts_with("application/json"));
    let error = response.json()["error"].as_str().unwrap().to_string();
    assert!(error.contains("not-an-id"));
}

#[tokio::test]
async fn test_approved_comments_exclude_other_posts() {
    let app = test_app().await;
    let mut ids = Vec::new();
    for post_id in ["p1", "p2"] {
        let body = json!({ "postId": post_id, "message": post_id }).to_string();
        let response = send(&app, "POST", "/comment/create", Some(&body)).await;
        ids.push(response.json()["comment"]["_id"].as_str().unwrap().to_string());
    }
    for id in &ids {
        send(&app, "PUT", &format!("/comment/approve/{}", id), None).await;
    }

    let response = send(&app, "GET", "/comments/p2", None).await;
    let comments = response.json();
    assert_eq!(comments.as_array().unwrap().len(), 1);
    assert_eq!(comments[0]["postId"], "p2");
    assert_eq!(comments[0]["_id"], json!(ids[1]));
}

#[tokio::test]
async fn test_bad_bodies_use_the_500_policy() {
    let app = test_app().await;

    let response = send(&app, "POST", "/post/create", Some("{not json")).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.json()["error"].is_string());

    let response = send(&app, "POST", "/post/create", Some("[1, 2]")).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);

    let response = send(&app, "POST", "/post/create", Some(r#"{"title":{"x":1}}"#)).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = response.json()["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Post validation failed: title: Cast to String failed"));

    let response = send(&app, "POST", "/comment/create", Some(r#"{"createdAt":"soon"}"#)).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);

    let response = send(&app, "GET", "/posts", None).await;
    assert_eq!(response.json(), json!([]));
}

#[tokio::test]
async fn test_empty_body_creates_bare_post() {
    let app = test_app().await;
    let response = send(&app, "POST", "/post/create", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let post = &response.json()["post"];
    assert!(post["_id"].is_string());
    assert!(post["createdAt"].is_string());
    assert!(post.get("title").is_none());
}

#[tokio::test]
async fn test_store_failure_is_500() {
    let app = test_app().await;
    app.database.close().await;

    for (method, uri, body) in [
        ("GET", "/posts", None),
        ("POST", "/post/create", Some(r#"{"title":"A"}"#)),
        ("POST", "/comment/create", Some(r#"{"postId":"p1"}"#)),
        ("GET", "/comments/pending", None),
        ("PUT", "/comment/approve/65e1904e0000000000000001", None),
        ("GET", "/comments/p1", None),
    ] {
        let response = send(&app, method, uri, body).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR, "{} {}", method, uri);
        assert!(response.json()["error"].is_string());
    }

    let response = send(&app, "GET", "/", None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = test_app().await;
    let request = Request::builder()
        .method("GET")
        .uri("/posts")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
