//! JSON text <-> MValue entry points

use crate::error::*;
use crate::registry::MarshallerRegistry;
use crate::session::MarshallingSession;
use crate::types::*;
use serde_json::Value as JsonValue;

/// Lift plain JSON into an MValue without the marshalling protocol.
///
/// Objects become string-keyed maps; embedded keys and record tags are
/// left as they are.
pub fn from_json(json: &JsonValue) -> MValue {
    match json {
        JsonValue::Null => MValue::Null,
        JsonValue::Bool(b) => MValue::Bool(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                MValue::Int(i)
            } else {
                MValue::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        JsonValue::String(s) => MValue::Str(s.clone()),
        JsonValue::Array(arr) => MValue::List(arr.iter().map(from_json).collect()),
        JsonValue::Object(obj) => MValue::Map(
            obj.iter()
                .map(|(k, v)| MapEntry::new(k.as_str(), from_json(v)))
                .collect(),
        ),
    }
}

/// Parse JSON text
pub fn parse_json(json_str: &str) -> Result<JsonValue> {
    Ok(serde_json::from_str(json_str)?)
}

/// Marshall a value in a fresh session
pub fn marshall(registry: &MarshallerRegistry, value: &MValue) -> Result<String> {
    let mut session = MarshallingSession::new(registry);
    let text = session.marshall(value)?;
    tracing::debug!(
        type_id = value.type_id(),
        len = text.len(),
        objects = session.object_count(),
        "marshalled value"
    );
    Ok(text)
}

/// Parse and demarshall JSON text in a fresh session
pub fn demarshall(registry: &MarshallerRegistry, text: &str, hint: Option<&str>) -> Result<MValue> {
    let json = parse_json(text)?;
    let mut session = MarshallingSession::new(registry);
    let value = session.demarshall(&json, hint)?;
    tracing::debug!(
        type_id = value.type_id(),
        hint,
        objects = session.object_count(),
        "demarshalled value"
    );
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_object() {
        let v = from_json(&json!({"a": 1, "b": [true, null]}));
        assert_eq!(v.get(&MValue::str("a")), Some(&MValue::int(1)));
        assert_eq!(
            v.get(&MValue::str("b")),
            Some(&MValue::list(vec![MValue::bool(true), MValue::Null]))
        );
    }

    #[test]
    fn test_from_json_float() {
        assert_eq!(from_json(&json!(3.25)), MValue::float(3.25));
    }

    #[test]
    fn test_plain_json_demarshalls_like_lift() {
        let registry = MarshallerRegistry::with_defaults();
        let data = json!({"name": "Alice", "age": 30, "scores": [95, 87.5]});
        let lifted = from_json(&data);
        let decoded = demarshall(&registry, &data.to_string(), None).unwrap();
        assert_eq!(decoded, lifted);
    }
}
