use axum::Router;
use tracing::error;

use crate::{
    blog_interface::create_blog_router,
    config::Config,
    error::AppResult,
    infrastructure::database::connect_database,
    services::BlogService,
};

/// Process-wide resources: the store connection is opened here once, before
/// any request is accepted, and released by `shutdown`.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let database = connect_database(&config.database)
            .await
            .inspect_err(|e| error!("Database connection error: {}", e))?;
        let blog = BlogService::new(database);

        Ok(Self { blog, config })
    }

    pub fn router(&self) -> Router {
        create_blog_router(self.blog.clone())
    }

    pub async fn shutdown(&self) {
        self.blog.database().close().await;
    }
}
