// Document identifiers - BSON ObjectIds rendered as 24 lowercase hex chars

use bson::oid::ObjectId;

/// Fresh store-assigned identifier
pub fn new_object_id() -> String {
    ObjectId::new().to_hex()
}

/// Validate and normalise a client-supplied identifier
pub fn parse_object_id(id: &str) -> Option<String> {
    ObjectId::parse_str(id).ok().map(|oid| oid.to_hex())
}
