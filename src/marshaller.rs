//! The marshaller capability contract

use crate::error::*;
use crate::session::MarshallingSession;
use crate::types::MValue;
use serde_json::Value as JsonValue;

/// Bidirectional JSON encoder/decoder bound to one canonical type identifier.
///
/// `marshall` writes `null` for a null value. `demarshall` returns
/// `MValue::Null` both for JSON `null` and for shapes the marshaller does
/// not decode. Nested values go back through the session so that every
/// level of a value is dispatched the same way.
pub trait Marshaller: Send + Sync {
    /// Canonical type identifier this marshaller is registered under
    fn type_id(&self) -> &str;

    /// Encode a value to JSON text
    fn marshall(&self, value: &MValue, session: &mut MarshallingSession<'_>) -> Result<String>;

    /// Decode a parsed JSON value
    fn demarshall(&self, json: &JsonValue, session: &mut MarshallingSession<'_>) -> Result<MValue>;

    /// Shape-level acceptance test used when no type hint is available
    fn handles(&self, json: &JsonValue) -> bool;
}

/// Quote and escape a string as a JSON string literal
pub fn quote_json(s: &str) -> Result<String> {
    Ok(serde_json::to_string(s)?)
}

/// Name of the syntactic shape of a JSON value
pub fn json_shape(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
