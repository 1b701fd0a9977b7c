//! JSON output formatter

use crate::models::CheckedServer;
use serde::Serialize;
use tracing::warn;

/// Returned instead of a result that could not be serialized
pub const JSON_ERROR_ENVELOPE: &str = "{ \"error\": \"Unable to convert result to json\"}";

/// Serialize a check result on a single line
pub fn as_json(server: &CheckedServer) -> String {
    to_json_or_envelope(server)
}

/// Serialize any value, falling back to [`JSON_ERROR_ENVELOPE`]
pub fn to_json_or_envelope<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        warn!("failed to serialize result: {}", e);
        JSON_ERROR_ENVELOPE.to_string()
    })
}
