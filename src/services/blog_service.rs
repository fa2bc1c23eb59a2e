// Blog Service - data access for posts and moderated comments
// Each operation is a single insert, filtered read or update against one collection.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    error::{AppError, AppResult},
    infrastructure::{
        database::{CommentQuery, DatabaseInterface},
        id_generator::{new_object_id, parse_object_id},
    },
    models::{Comment, Post},
    schemas::{CommentSchema, Document, PostSchema},
};

#[derive(Clone)]
pub struct BlogService {
    db: Arc<dyn DatabaseInterface>,
}

impl BlogService {
    pub fn new(db: Arc<dyn DatabaseInterface>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> Arc<dyn DatabaseInterface> {
        self.db.clone()
    }

    pub async fn create_post(&self, fields: &Map<String, Value>) -> AppResult<Post> {
        let doc = Document::from_json::<PostSchema>(fields)?;
        let post = Post::from_document(new_object_id(), &doc);

        self.db.insert_post(&post).await?;
        info!("Created post {}", post.id);
        Ok(post)
    }

    pub async fn list_posts(&self) -> AppResult<Vec<Post>> {
        let posts = self.db.get_posts().await?;
        debug!("Fetched {} posts", posts.len());
        Ok(posts)
    }

    /// Submit a comment for review; it is stored as pending whatever the body says
    pub async fn create_comment(&self, fields: &Map<String, Value>) -> AppResult<Comment> {
        let doc = Document::from_json::<CommentSchema>(fields)?;
        let comment = Comment::from_document(new_object_id(), &doc);

        self.db.insert_comment(&comment).await?;
        info!(
            "Created pending comment {} on post {}",
            comment.id,
            comment.post_id.as_deref().unwrap_or("<none>")
        );
        Ok(comment)
    }

    pub async fn list_pending_comments(&self) -> AppResult<Vec<Comment>> {
        let comments = self.db.get_comments(CommentQuery::pending()).await?;
        debug!("Fetched {} pending comments", comments.len());
        Ok(comments)
    }

    /// Mark a comment approved. Unknown ids succeed silently; only a malformed
    /// id or a store failure is an error. Returns the id as supplied.
    pub async fn approve_comment(&self, id: &str) -> AppResult<String> {
        let object_id = parse_object_id(id).ok_or_else(|| {
            AppError::InvalidId(format!(
                "Cast to ObjectId failed for value \"{}\" at path \"_id\" for model \"Comment\"",
                id
            ))
        })?;

        let matched = self.db.set_comment_approved(&object_id, true).await?;
        if matched == 0 {
            info!("Approve requested for unknown comment {}", object_id);
        } else {
            info!("Approved comment {}", object_id);
        }
        Ok(id.to_string())
    }

    pub async fn list_approved_comments(&self, post_id: &str) -> AppResult<Vec<Comment>> {
        let comments = self
            .db
            .get_comments(CommentQuery::approved_for_post(post_id))
            .await?;
        debug!("Fetched {} approved comments for post {}", comments.len(), post_id);
        Ok(comments)
    }
}
