// Blog API - posts and moderated comments over a document store

// Configuration and process-wide state
pub mod app_state;
pub mod config;

// HTTP routes
pub mod blog_interface;

// Store backends, identifier generation and request extractors
pub mod infrastructure;

// Document models and the schemas that coerce request bodies into them
pub mod models;
pub mod schemas;

// Data access layer
pub mod services;

// Common utilities
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};
