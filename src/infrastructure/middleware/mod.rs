pub mod json_object_extractor;

pub use json_object_extractor::JsonObject;
