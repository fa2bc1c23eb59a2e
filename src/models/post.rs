use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schemas::{now_millis, Document};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(with = "super::rfc3339_millis")]
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Build a post from a coerced document and a freshly assigned id
    pub fn from_document(id: String, doc: &Document) -> Self {
        Self {
            id,
            title: doc.string("title"),
            content: doc.string("content"),
            created_at: doc.time("createdAt").unwrap_or_else(now_millis),
        }
    }
}
