use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const ROOT_PATH: &str = "/api/v1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub body: String,
    pub postable_type: String,
    pub postable_id: u64,
    pub creator_id: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub body: String,
    pub creator_id: u64,
    pub post_id: u64,
}

#[derive(Deserialize)]
pub struct NewPost {
    pub body: String,
    pub postable_id: Option<u64>,
    pub postable_type: Option<String>,
    pub creator_id: Option<u64>,
}

#[derive(Deserialize)]
pub struct NewComment {
    pub comment: CommentInput,
}

#[derive(Deserialize)]
pub struct CommentInput {
    pub body: String,
    pub creator_id: u64,
}

#[derive(Deserialize)]
pub struct Liker {
    pub liker_id: u64,
}

#[derive(Deserialize)]
pub struct CurrentUser {
    pub current_user: Option<String>,
}

#[derive(Deserialize)]
pub struct PostableType {
    pub postable_type: String,
}

#[derive(Debug, Default)]
pub struct Store {
    next_post_id: u64,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    likes: HashMap<u64, Vec<u64>>,
}

impl Store {
    fn post(&self, id: u64) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    fn posts_of(&self, postable_type: &str, postable_id: u64) -> Vec<Post> {
        self.posts
            .iter()
            .filter(|p| p.postable_type == postable_type && p.postable_id == postable_id)
            .cloned()
            .collect()
    }

    fn likers_mut(&mut self, post_id: u64) -> &mut Vec<u64> {
        self.likes.entry(post_id).or_default()
    }

    fn likers(&self, post_id: u64) -> Vec<u64> {
        self.likes.get(&post_id).cloned().unwrap_or_default()
    }

    fn remove_posts(&mut self, keep: impl Fn(&Post) -> bool) -> usize {
        let before = self.posts.len();
        self.posts.retain(|p| keep(p));
        let live: Vec<u64> = self.posts.iter().map(|p| p.id).collect();
        self.comments.retain(|c| live.contains(&c.post_id));
        self.likes.retain(|id, _| live.contains(id));
        before - self.posts.len()
    }
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let api = Router::new()
        .route("/users/{user_id}/posts", get(user_posts))
        .route("/groups/{group_id}/posts", get(group_posts))
        .route("/posts", post(create_post))
        .route("/posts/{post_id}", delete(delete_post))
        .route("/postable/{postable_id}/posts", delete(delete_posts_for))
        .route(
            "/posts/{post_id}/comments",
            get(post_comments).post(create_comment),
        )
        .route(
            "/posts/{post_id}/comments/{comment_id}",
            delete(delete_comment),
        )
        .route("/posts/{post_id}/toggle_like", post(toggle_like))
        .route("/posts/{post_id}/likers", get(likers))
        .with_state(db);
    Router::new().nest(ROOT_PATH, api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({"error": "not found"})))
}

fn forbidden() -> (StatusCode, Json<Value>) {
    (StatusCode::FORBIDDEN, Json(json!({"error": "forbidden"})))
}

/// A caller may delete a resource when it names no identity, when the
/// resource has no recorded creator, or when the two match.
fn may_delete(current_user: Option<&str>, creator_id: Option<u64>) -> bool {
    match (current_user, creator_id) {
        (Some(user), Some(creator)) => user == creator.to_string(),
        _ => true,
    }
}

async fn user_posts(State(db): State<Db>, Path(user_id): Path<u64>) -> Json<Vec<Post>> {
    Json(db.read().await.posts_of("User", user_id))
}

async fn group_posts(State(db): State<Db>, Path(group_id): Path<u64>) -> Json<Vec<Post>> {
    Json(db.read().await.posts_of("Group", group_id))
}

async fn create_post(State(db): State<Db>, Json(input): Json<NewPost>) -> Json<Value> {
    let mut store = db.write().await;
    store.next_post_id += 1;
    let post = Post {
        id: store.next_post_id,
        body: input.body,
        postable_type: input.postable_type.unwrap_or_else(|| "User".to_string()),
        postable_id: input.postable_id.or(input.creator_id).unwrap_or_default(),
        creator_id: input.creator_id,
    };
    info!(post_id = post.id, postable_type = %post.postable_type, "post created");
    store.posts.push(post);
    Json(json!({"message": "Post successfully created"}))
}

async fn delete_post(
    State(db): State<Db>,
    Path(post_id): Path<u64>,
    Query(query): Query<CurrentUser>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let post = store.post(post_id).ok_or_else(not_found)?;
    if !may_delete(query.current_user.as_deref(), post.creator_id) {
        return Err(forbidden());
    }
    store.remove_posts(|p| p.id != post_id);
    info!(post_id, "post destroyed");
    Ok(Json(json!({"message": "Post successfully destroyed"})))
}

async fn delete_posts_for(
    State(db): State<Db>,
    Path(postable_id): Path<u64>,
    Query(query): Query<PostableType>,
) -> Json<Value> {
    let mut store = db.write().await;
    let removed = store.remove_posts(|p| {
        !(p.postable_id == postable_id && p.postable_type == query.postable_type)
    });
    info!(postable_id, postable_type = %query.postable_type, removed, "postable posts destroyed");
    Json(json!({"status": "success"}))
}

async fn post_comments(
    State(db): State<Db>,
    Path(post_id): Path<u64>,
) -> ApiResult<Json<Vec<Comment>>> {
    let store = db.read().await;
    store.post(post_id).ok_or_else(not_found)?;
    let comments = store
        .comments
        .iter()
        .filter(|c| c.post_id == post_id)
        .cloned()
        .collect();
    Ok(Json(comments))
}

async fn create_comment(
    State(db): State<Db>,
    Path(post_id): Path<u64>,
    Json(input): Json<NewComment>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    store.post(post_id).ok_or_else(not_found)?;
    let comment = Comment {
        id: Uuid::new_v4(),
        body: input.comment.body,
        creator_id: input.comment.creator_id,
        post_id,
    };
    debug!(post_id, comment_id = %comment.id, "comment created");
    store.comments.push(comment.clone());
    Ok(Json(json!({"comment": comment})))
}

async fn delete_comment(
    State(db): State<Db>,
    Path((post_id, comment_id)): Path<(u64, Uuid)>,
    Query(query): Query<CurrentUser>,
) -> ApiResult<Json<Uuid>> {
    let mut store = db.write().await;
    let comment = store
        .comments
        .iter()
        .find(|c| c.id == comment_id && c.post_id == post_id)
        .ok_or_else(not_found)?;
    if !may_delete(query.current_user.as_deref(), Some(comment.creator_id)) {
        return Err(forbidden());
    }
    store.comments.retain(|c| c.id != comment_id);
    debug!(post_id, %comment_id, "comment destroyed");
    Ok(Json(comment_id))
}

async fn toggle_like(
    State(db): State<Db>,
    Path(post_id): Path<u64>,
    Json(input): Json<Liker>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    store.post(post_id).ok_or_else(not_found)?;
    let likers = store.likers_mut(post_id);
    match likers.iter().position(|id| *id == input.liker_id) {
        Some(index) => {
            likers.remove(index);
        }
        None => likers.push(input.liker_id),
    }
    Ok(Json(json!({"likes_count": likers.len()})))
}

async fn likers(State(db): State<Db>, Path(post_id): Path<u64>) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    store.post(post_id).ok_or_else(not_found)?;
    Ok(Json(json!({"likers_ids": store.likers(post_id)})))
}
