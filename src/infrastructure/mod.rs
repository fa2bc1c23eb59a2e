// Core infrastructure modules
pub mod database;        // Database interface and PostgreSQL implementation
pub mod sqlite_database; // SQLite implementation (file or in-memory)
pub mod id_generator;    // Document identifiers
pub mod middleware;      // Request extractors

pub use database::{connect_database, CommentQuery, DatabaseInterface, PostgresDatabase};
pub use id_generator::{new_object_id, parse_object_id};
pub use sqlite_database::SqliteDatabase;
