// Database Interface - Document store operations for the blog collections
// Posts and comments each live in one table; every call touches a single table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder, Row};
use std::sync::Arc;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};
use crate::infrastructure::sqlite_database::SqliteDatabase;
use crate::models::{Comment, Post};

/// Filter for comment reads. `None` leaves the column unconstrained.
#[derive(Debug, Clone, Default)]
pub struct CommentQuery {
    pub approved: Option<bool>,
    pub post_id: Option<String>,
}

impl CommentQuery {
    pub fn pending() -> Self {
        Self {
            approved: Some(false),
            post_id: None,
        }
    }

    pub fn approved_for_post(post_id: impl Into<String>) -> Self {
        Self {
            approved: Some(true),
            post_id: Some(post_id.into()),
        }
    }
}

/// Database interface trait for the blog collections.
/// Reads are always ordered newest first by `created_at`, ties broken by
/// insertion order.
#[async_trait]
pub trait DatabaseInterface: Send + Sync {
    /// Short backend name for logs
    fn backend(&self) -> &'static str;

    /// Create tables and indexes if they do not exist yet
    async fn initialize(&self) -> AppResult<()>;

    async fn insert_post(&self, post: &Post) -> AppResult<()>;
    async fn get_posts(&self) -> AppResult<Vec<Post>>;

    async fn insert_comment(&self, comment: &Comment) -> AppResult<()>;
    async fn get_comments(&self, query: CommentQuery) -> AppResult<Vec<Comment>>;
    /// Returns the number of comments matched; zero is not an error
    async fn set_comment_approved(&self, id: &str, approved: bool) -> AppResult<u64>;

    /// Release all pooled connections
    async fn close(&self);
}

pub(crate) fn millis_to_datetime(ms: i64) -> AppResult<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .ok_or_else(|| AppError::DatabaseError(format!("Stored timestamp {} is out of range", ms)))
}

/// Connect to the store named by the connection string and ensure its schema
pub async fn connect_database(config: &DatabaseConfig) -> AppResult<Arc<dyn DatabaseInterface>> {
    let url = config.url.as_str();

    let database: Arc<dyn DatabaseInterface> =
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(url)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(format!("Failed to connect to PostgreSQL: {}", e))
                })?;
            Arc::new(PostgresDatabase::new(pool))
        } else if url.starts_with("sqlite:") {
            Arc::new(SqliteDatabase::connect(url, config.max_connections).await?)
        } else {
            return Err(AppError::ConfigurationError(format!(
                "Unsupported database URL scheme: {}",
                url.split(':').next().unwrap_or_default()
            )));
        };

    if let Err(e) = database.initialize().await {
        database.close().await;
        return Err(e);
    }

    info!("{} database connected", database.backend());
    Ok(database)
}

/// PostgreSQL implementation of database interface
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn post_from_row(row: &sqlx::postgres::PgRow) -> AppResult<Post> {
        Ok(Post {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            created_at: millis_to_datetime(row.try_get("created_at")?)?,
        })
    }

    fn comment_from_row(row: &sqlx::postgres::PgRow) -> AppResult<Comment> {
        Ok(Comment {
            id: row.try_get("id")?,
            post_id: row.try_get("post_id")?,
            username: row.try_get("username")?,
            message: row.try_get("message")?,
            approved: row.try_get("approved")?,
            created_at: millis_to_datetime(row.try_get("created_at")?)?,
        })
    }
}

#[async_trait]
impl DatabaseInterface for PostgresDatabase {
    fn backend(&self) -> &'static str {
        "PostgreSQL"
    }

    async fn initialize(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                seq BIGSERIAL PRIMARY KEY,
                id VARCHAR(24) NOT NULL UNIQUE,
                title TEXT,
                content TEXT,
                created_at BIGINT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create posts table: {}", e)))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS comments (
                seq BIGSERIAL PRIMARY KEY,
                id VARCHAR(24) NOT NULL UNIQUE,
                post_id TEXT,
                username TEXT,
                message TEXT,
                approved BOOLEAN NOT NULL DEFAULT FALSE,
                created_at BIGINT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create comments table: {}", e)))?;

        let indexes = [
            "CREATE INDEX IF NOT EXISTS idx_posts_created ON posts (created_at DESC, seq DESC)",
            "CREATE INDEX IF NOT EXISTS idx_comments_approved ON comments (approved, created_at DESC)",
            "CREATE INDEX IF NOT EXISTS idx_comments_post_approved ON comments (post_id, approved, created_at DESC)",
        ];
        for statement in indexes {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::DatabaseError(format!("Failed to create index: {}", e)))?;
        }

        Ok(())
    }

    async fn insert_post(&self, post: &Post) -> AppResult<()> {
        sqlx::query("INSERT INTO posts (id, title, content, created_at) VALUES ($1, $2, $3, $4)")
            .bind(&post.id)
            .bind(&post.title)
            .bind(&post.content)
            .bind(post.created_at.timestamp_millis())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to insert post {}: {}", post.id, e)))?;
        Ok(())
    }

    async fn get_posts(&self) -> AppResult<Vec<Post>> {
        let rows = sqlx::query(
            "SELECT id, title, content, created_at FROM posts ORDER BY created_at DESC, seq DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to get posts: {}", e)))?;

        rows.iter().map(Self::post_from_row).collect()
    }

    async fn insert_comment(&self, comment: &Comment) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO comments (id, post_id, username, message, approved, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&comment.id)
        .bind(&comment.post_id)
        .bind(&comment.username)
        .bind(&comment.message)
        .bind(comment.approved)
        .bind(comment.created_at.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(format!("Failed to insert comment {}: {}", comment.id, e))
        })?;
        Ok(())
    }

    async fn get_comments(&self, query: CommentQuery) -> AppResult<Vec<Comment>> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT id, post_id, username, message, approved, created_at FROM comments WHERE 1 = 1",
        );
        if let Some(approved) = query.approved {
            qb.push(" AND approved = ");
            qb.push_bind(approved);
        }
        if let Some(post_id) = query.post_id {
            qb.push(" AND post_id = ");
            qb.push_bind(post_id);
        }
        qb.push(" ORDER BY created_at DESC, seq DESC");

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to get comments: {}", e)))?;

        rows.iter().map(Self::comment_from_row).collect()
    }

    async fn set_comment_approved(&self, id: &str, approved: bool) -> AppResult<u64> {
        let result = sqlx::query("UPDATE comments SET approved = $1 WHERE id = $2")
            .bind(approved)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update comment {}: {}", id, e)))?;
        Ok(result.rows_affected())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
