use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schemas::{now_millis, Document};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub approved: bool,
    #[serde(with = "super::rfc3339_millis")]
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Build a pending comment from a coerced document and a freshly assigned id
    pub fn from_document(id: String, doc: &Document) -> Self {
        Self {
            id,
            post_id: doc.string("postId"),
            username: doc.string("username"),
            message: doc.string("message"),
            approved: doc.bool("approved").unwrap_or(false),
            created_at: doc.time("createdAt").unwrap_or_else(now_millis),
        }
    }
}
