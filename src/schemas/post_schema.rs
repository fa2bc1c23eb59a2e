// Post document schema

use super::{DocumentSchema, FieldDefault, FieldDefinition, FieldType};

pub struct PostSchema;

impl DocumentSchema for PostSchema {
    const MODEL: &'static str = "Post";

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("title", FieldType::String),
            FieldDefinition::new("content", FieldType::String),
            // Set once at creation, never updated
            FieldDefinition::new("createdAt", FieldType::Time).default_value(FieldDefault::Now),
        ]
    }
}
