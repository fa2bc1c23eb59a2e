// Document schemas - declarative field definitions and JSON coercion

pub mod comment_schema;
pub mod post_schema;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::{AppError, AppResult};

pub use comment_schema::CommentSchema;
pub use post_schema::PostSchema;

/// Schema definition for one document collection
pub trait DocumentSchema {
    /// Model name used in validation messages
    const MODEL: &'static str;

    fn fields() -> Vec<FieldDefinition>;
}

#[derive(Debug, Clone)]
pub struct FieldDefinition {
    /// JSON key of the field
    pub name: &'static str,
    pub field_type: FieldType,
    pub default: Option<FieldDefault>,
    /// Ignore any client-supplied value and always apply the default
    pub server_assigned: bool,
}

impl FieldDefinition {
    pub fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            default: None,
            server_assigned: false,
        }
    }

    pub fn default_value(mut self, default: FieldDefault) -> Self {
        self.default = Some(default);
        self
    }

    pub fn server_assigned(mut self) -> Self {
        self.server_assigned = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Bool,
    Time,
}

impl FieldType {
    fn name(self) -> &'static str {
        match self {
            FieldType::String => "String",
            FieldType::Bool => "Boolean",
            FieldType::Time => "Date",
        }
    }
}

#[derive(Debug, Clone)]
pub enum FieldDefault {
    Bool(bool),
    Now,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Bool(bool),
    Time(DateTime<Utc>),
}

/// A JSON object coerced against a schema. Absent fields without defaults are
/// simply missing.
#[derive(Debug, Clone, Default)]
pub struct Document {
    values: HashMap<&'static str, FieldValue>,
}

impl Document {
    /// Coerce `body` field by field. Unknown keys are dropped, cast failures are
    /// collected into a single validation error.
    pub fn from_json<S: DocumentSchema>(body: &Map<String, Value>) -> AppResult<Self> {
        let now = now_millis();
        let mut values = HashMap::new();
        let mut errors = Vec::new();

        for field in S::fields() {
            let supplied = if field.server_assigned {
                None
            } else {
                body.get(field.name).filter(|v| !v.is_null())
            };

            let value = match supplied {
                Some(raw) => match coerce(field.field_type, raw) {
                    Some(value) => Some(value),
                    None => {
                        errors.push(format!(
                            "{name}: Cast to {ty} failed for value {raw} (type {kind}) at path \"{name}\"",
                            name = field.name,
                            ty = field.field_type.name(),
                            raw = raw,
                            kind = json_kind(raw),
                        ));
                        continue;
                    }
                },
                None => field.default.as_ref().map(|default| match default {
                    FieldDefault::Bool(b) => FieldValue::Bool(*b),
                    FieldDefault::Now => FieldValue::Time(now),
                }),
            };

            if let Some(value) = value {
                values.insert(field.name, value);
            }
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(format!(
                "{} validation failed: {}",
                S::MODEL,
                errors.join(", ")
            )));
        }

        Ok(Self { values })
    }

    pub fn string(&self, name: &str) -> Option<String> {
        match self.values.get(name) {
            Some(FieldValue::String(s)) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(FieldValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn time(&self, name: &str) -> Option<DateTime<Utc>> {
        match self.values.get(name) {
            Some(FieldValue::Time(t)) => Some(*t),
            _ => None,
        }
    }
}

/// Current time truncated to the millisecond precision the store keeps
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::<Utc>::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

fn coerce(field_type: FieldType, raw: &Value) -> Option<FieldValue> {
    match field_type {
        FieldType::String => match raw {
            Value::String(s) => Some(FieldValue::String(s.clone())),
            Value::Number(n) => Some(FieldValue::String(n.to_string())),
            Value::Bool(b) => Some(FieldValue::String(b.to_string())),
            _ => None,
        },
        FieldType::Bool => match raw {
            Value::Bool(b) => Some(FieldValue::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(1) => Some(FieldValue::Bool(true)),
                Some(0) => Some(FieldValue::Bool(false)),
                _ => None,
            },
            Value::String(s) => match s.as_str() {
                "true" | "1" | "yes" => Some(FieldValue::Bool(true)),
                "false" | "0" | "no" => Some(FieldValue::Bool(false)),
                _ => None,
            },
            _ => None,
        },
        FieldType::Time => {
            let parsed = match raw {
                Value::String(s) => parse_time(s),
                Value::Number(n) => match n.as_i64() {
                    Some(ms) => DateTime::<Utc>::from_timestamp_millis(ms),
                    None => n.as_f64().and_then(from_fractional_millis),
                },
                _ => None,
            };
            parsed
                .and_then(|t| DateTime::<Utc>::from_timestamp_millis(t.timestamp_millis()))
                .map(FieldValue::Time)
        }
    }
}

fn parse_time(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    if let Some(t) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Some(t.and_utc());
    }
    // Numeric strings are epoch millis
    s.trim().parse::<f64>().ok().and_then(from_fractional_millis)
}

fn from_fractional_millis(ms: f64) -> Option<DateTime<Utc>> {
    let ms = ms.trunc();
    if !ms.is_finite() || ms < i64::MIN as f64 || ms >= i64::MAX as f64 {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(ms as i64)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "Array",
        Value::Object(_) => "Object",
    }
}
