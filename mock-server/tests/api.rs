use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Comment, Post};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

async fn call<S>(app: &mut S, req: Request<String>) -> axum::response::Response
where
    S: tower::Service<Request<String>, Response = axum::response::Response>,
    S::Error: std::fmt::Debug,
{
    ServiceExt::ready(app).await.unwrap().call(req).await.unwrap()
}

// --- posts ---

#[tokio::test]
async fn user_posts_empty() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/v1/users/1/posts"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let posts: Vec<Post> = body_json(resp).await;
    assert!(posts.is_empty());
}

#[tokio::test]
async fn create_post_returns_message() {
    let resp = app()
        .oneshot(json_request("POST", "/api/v1/posts", r#"{"body":"some text"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"message": "Post successfully created"}));
}

#[tokio::test]
async fn create_post_without_body_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/api/v1/posts", r#"{"creator_id":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn routes_live_under_root_path() {
    let resp = app()
        .oneshot(empty_request("GET", "/users/1/posts"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_unknown_post_returns_404_with_error_body() {
    let resp = app()
        .oneshot(empty_request("DELETE", "/api/v1/posts/99"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"error": "not found"}));
}

#[tokio::test]
async fn non_numeric_post_id_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/v1/posts/abc/likers"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_posts_for_requires_postable_type() {
    let resp = app()
        .oneshot(empty_request("DELETE", "/api/v1/postable/1/posts"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn comments_of_unknown_post_return_404() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/v1/posts/1/comments"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- ownership ---

#[tokio::test]
async fn delete_post_of_someone_else_returns_403() {
    let mut app = app().into_service();

    let resp = call(
        &mut app,
        json_request("POST", "/api/v1/posts", r#"{"body":"mine","creator_id":1}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = call(&mut app, empty_request("DELETE", "/api/v1/posts/1?current_user=2")).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = call(&mut app, empty_request("DELETE", "/api/v1/posts/1?current_user=1")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"message": "Post successfully destroyed"}));
}

// --- full lifecycle ---

#[tokio::test]
async fn posts_comments_likes_lifecycle() {
    let mut app = app().into_service();

    // user post and group post
    let resp = call(
        &mut app,
        json_request("POST", "/api/v1/posts", r#"{"body":"hello","creator_id":1}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = call(
        &mut app,
        json_request(
            "POST",
            "/api/v1/posts",
            r#"{"body":"team update","postable_id":3,"postable_type":"Group","creator_id":1}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = call(&mut app, empty_request("GET", "/api/v1/users/1/posts")).await;
    let posts: Vec<Post> = body_json(resp).await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].body, "hello");
    assert_eq!(posts[0].postable_type, "User");
    let post_id = posts[0].id;

    let resp = call(&mut app, empty_request("GET", "/api/v1/groups/3/posts")).await;
    let posts: Vec<Post> = body_json(resp).await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].postable_type, "Group");

    // comment
    let resp = call(
        &mut app,
        json_request(
            "POST",
            &format!("/api/v1/posts/{post_id}/comments"),
            r#"{"comment":{"body":"nice","creator_id":2}}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = body_json(resp).await;
    assert_eq!(created["comment"]["body"], "nice");
    assert_eq!(created["comment"]["post_id"], post_id);

    let resp = call(
        &mut app,
        empty_request("GET", &format!("/api/v1/posts/{post_id}/comments")),
    )
    .await;
    let comments: Vec<Comment> = body_json(resp).await;
    assert_eq!(comments.len(), 1);
    let comment_id = comments[0].id;

    // likes toggle on and off
    for (liker, expected) in [(6, 1), (20, 2), (6, 1)] {
        let resp = call(
            &mut app,
            json_request(
                "POST",
                &format!("/api/v1/posts/{post_id}/toggle_like"),
                &format!(r#"{{"liker_id":{liker}}}"#),
            ),
        )
        .await;
        let body: Value = body_json(resp).await;
        assert_eq!(body, json!({"likes_count": expected}));
    }
    let resp = call(
        &mut app,
        empty_request("GET", &format!("/api/v1/posts/{post_id}/likers")),
    )
    .await;
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"likers_ids": [20]}));

    // delete comment returns its guid
    let resp = call(
        &mut app,
        empty_request(
            "DELETE",
            &format!("/api/v1/posts/{post_id}/comments/{comment_id}?current_user=2"),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!(comment_id.to_string()));

    // delete every user post
    let resp = call(
        &mut app,
        empty_request("DELETE", "/api/v1/postable/1/posts?postable_type=User"),
    )
    .await;
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"status": "success"}));

    let resp = call(&mut app, empty_request("GET", "/api/v1/users/1/posts")).await;
    let posts: Vec<Post> = body_json(resp).await;
    assert!(posts.is_empty());

    // group post untouched
    let resp = call(&mut app, empty_request("GET", "/api/v1/groups/3/posts")).await;
    let posts: Vec<Post> = body_json(resp).await;
    assert_eq!(posts.len(), 1);

    // likers of a deleted post
    let resp = call(
        &mut app,
        empty_request("GET", &format!("/api/v1/posts/{post_id}/likers")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(!body_bytes(resp).await.is_empty());
}
