use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    QueryBuilder, Row, Sqlite, SqlitePool,
};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{AppError, AppResult};
use crate::infrastructure::database::{millis_to_datetime, CommentQuery, DatabaseInterface};
use crate::models::{Comment, Post};

/// SQLite implementation of database interface, file backed or in-memory
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Single-connection in-memory store; the database lives as long as the pool
    pub async fn new_in_memory() -> AppResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to connect to in-memory SQLite: {}", e))
            })?;

        let db = Self { pool };
        db.initialize().await?;
        Ok(db)
    }

    /// Open the database named by a `sqlite:` URL, creating the file and its
    /// parent directory when missing. Tables are created by `initialize`.
    pub async fn connect(url: &str, max_connections: u32) -> AppResult<Self> {
        let Some(path) = sqlite_file_path(url) else {
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(url)
                .await
                .map_err(|e| AppError::DatabaseError(format!("Failed to connect to SQLite: {}", e)))?;
            return Ok(Self { pool });
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::DatabaseError(format!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::ConfigurationError(format!("Invalid SQLite URL: {}", e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect to SQLite: {}", e)))?;

        Ok(Self { pool })
    }

    fn post_from_row(row: &SqliteRow) -> AppResult<Post> {
        Ok(Post {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            created_at: millis_to_datetime(row.try_get("created_at")?)?,
        })
    }

    fn comment_from_row(row: &SqliteRow) -> AppResult<Comment> {
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

/// File path of a `sqlite:` URL, `None` for in-memory databases
fn sqlite_file_path(url: &str) -> Option<PathBuf> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" || url.contains("mode=memory") {
        return None;
    }
    Some(PathBuf::from(path))
}

#[async_trait]
impl DatabaseInterface for SqliteDatabase {
    fn backend(&self) -> &'static str {
        "SQLite"
    }

    async fn initialize(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                title TEXT,
                content TEXT,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create posts table: {}", e)))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS comments (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                post_id TEXT,
                username TEXT,
                message TEXT,
                approved BOOLEAN NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create comments table: {}", e)))?;

        let indexes = [
            "CREATE INDEX IF NOT EXISTS idx_posts_created ON posts(created_at DESC, seq DESC)",
            "CREATE INDEX IF NOT EXISTS idx_comments_approved ON comments(approved, created_at DESC)",
            "CREATE INDEX IF NOT EXISTS idx_comments_post_approved ON comments(post_id, approved, created_at DESC)",
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
        sqlx::query("INSERT INTO posts (id, title, content, created_at) VALUES (?, ?, ?, ?)")
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
            "INSERT INTO comments (id, post_id, username, message, approved, created_at) VALUES (?, ?, ?, ?, ?, ?)",
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
        let mut qb = QueryBuilder::<Sqlite>::new(
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
        let result = sqlx::query("UPDATE comments SET approved = ? WHERE id = ?")
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
