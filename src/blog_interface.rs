// Blog HTTP Interface - routes for posts and comment moderation
// Every route maps to one BlogService call; failures become 500 {"error": ...}.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::{AppError, AppResult},
    infrastructure::middleware::JsonObject,
    models::{Comment, Post},
    services::BlogService,
};

pub const HEALTH_MESSAGE: &str = "Blog API is running";

#[derive(Debug, Serialize)]
pub struct PostCreatedResponse {
    pub message: &'static str,
    pub post: Post,
}

#[derive(Debug, Serialize)]
pub struct CommentSubmittedResponse {
    pub message: &'static str,
    pub comment: Comment,
}

#[derive(Debug, Serialize)]
pub struct CommentApprovedResponse {
    pub message: &'static str,
    pub id: String,
}

// HTTP Handlers

pub async fn create_post_handler(
    State(blog): State<BlogService>,
    JsonObject(body): JsonObject,
) -> AppResult<Json<PostCreatedResponse>> {
    let post = blog.create_post(&body).await?;
    Ok(Json(PostCreatedResponse {
        message: "Post created",
        post,
    }))
}

pub async fn list_posts_handler(State(blog): State<BlogService>) -> AppResult<Json<Vec<Post>>> {
    Ok(Json(blog.list_posts().await?))
}

pub async fn create_comment_handler(
    State(blog): State<BlogService>,
    JsonObject(body): JsonObject,
) -> AppResult<Json<CommentSubmittedResponse>> {
    let comment = blog.create_comment(&body).await?;
    Ok(Json(CommentSubmittedResponse {
        message: "Comment submitted for review",
        comment,
    }))
}

pub async fn list_pending_comments_handler(
    State(blog): State<BlogService>,
) -> AppResult<Json<Vec<Comment>>> {
    Ok(Json(blog.list_pending_comments().await?))
}

pub async fn approve_comment_handler(
    State(blog): State<BlogService>,
    id: Result<Path<String>, PathRejection>,
) -> AppResult<Json<CommentApprovedResponse>> {
    let Path(id) = id.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let id = blog.approve_comment(&id).await?;
    Ok(Json(CommentApprovedResponse {
        message: "Comment Approved",
        id,
    }))
}

pub async fn list_approved_comments_handler(
    State(blog): State<BlogService>,
    post_id: Result<Path<String>, PathRejection>,
) -> AppResult<Json<Vec<Comment>>> {
    let Path(post_id) = post_id.map_err(|e| AppError::BadRequest(e.body_text()))?;
    Ok(Json(blog.list_approved_comments(&post_id).await?))
}

pub async fn health_check() -> &'static str {
    HEALTH_MESSAGE
}

// Create blog router. The static `/comments/pending` route wins over `/comments/{post_id}`.
pub fn create_blog_router(blog: BlogService) -> Router {
    Router::new()
        .route("/", get(health_check))
        // Posts
        .route("/post/create", post(create_post_handler))
        .route("/posts", get(list_posts_handler))
        // Comments
        .route("/comment/create", post(create_comment_handler))
        .route("/comments/pending", get(list_pending_comments_handler))
        .route("/comment/approve/{id}", put(approve_comment_handler))
        .route("/comments/{post_id}", get(list_approved_comments_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(blog)
}
