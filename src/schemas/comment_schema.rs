// Comment document schema

use super::{DocumentSchema, FieldDefault, FieldDefinition, FieldType};

pub struct CommentSchema;

impl DocumentSchema for CommentSchema {
    const MODEL: &'static str = "Comment";

    fn fields() -> Vec<FieldDefinition> {
        vec![
            // Not checked against existing posts
            FieldDefinition::new("postId", FieldType::String),
            FieldDefinition::new("username", FieldType::String),
            FieldDefinition::new("message", FieldType::String),
            // Comments always enter moderation as pending
            FieldDefinition::new("approved", FieldType::Bool)
                .default_value(FieldDefault::Bool(false))
                .server_assigned(),
            FieldDefinition::new("createdAt", FieldType::Time).default_value(FieldDefault::Now),
        ]
    }
}
