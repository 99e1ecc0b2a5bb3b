//! Scalar marshallers

use crate::error::*;
use crate::marshaller::{quote_json, Marshaller};
use crate::session::MarshallingSession;
use crate::types::MValue;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Number, Value as JsonValue};

#[derive(Debug, Clone, Copy, Default)]
pub struct StringMarshaller;

impl Marshaller for StringMarshaller {
    fn type_id(&self) -> &str {
        "string"
    }

    fn marshall(&self, value: &MValue, _: &mut MarshallingSession<'_>) -> Result<String> {
        match value {
            MValue::Str(s) => quote_json(s),
            _ => Ok("null".to_string()),
        }
    }

    fn demarshall(&self, json: &JsonValue, _: &mut MarshallingSession<'_>) -> Result<MValue> {
        Ok(json.as_str().map(MValue::str).unwrap_or(MValue::Null))
    }

    fn handles(&self, json: &JsonValue) -> bool {
        json.is_string()
    }
}

/// Integral numbers; a non-integral number is not handled
#[derive(Debug, Clone, Copy, Default)]
pub struct LongMarshaller;

impl Marshaller for LongMarshaller {
    fn type_id(&self) -> &str {
        "long"
    }

    fn marshall(&self, value: &MValue, _: &mut MarshallingSession<'_>) -> Result<String> {
        match value {
            MValue::Int(n) => Ok(n.to_string()),
            _ => Ok("null".to_string()),
        }
    }

    fn demarshall(&self, json: &JsonValue, _: &mut MarshallingSession<'_>) -> Result<MValue> {
        Ok(json.as_i64().map(MValue::Int).unwrap_or(MValue::Null))
    }

    fn handles(&self, json: &JsonValue) -> bool {
        json.is_i64()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleMarshaller;

impl Marshaller for DoubleMarshaller {
    fn type_id(&self) -> &str {
        "double"
    }

    // NaN and infinities have no JSON form and are written as null.
    fn marshall(&self, value: &MValue, _: &mut MarshallingSession<'_>) -> Result<String> {
        let number = match value {
            MValue::Float(f) => Number::from_f64(*f),
            _ => None,
        };
        Ok(number
            .map(|n| n.to_string())
            .unwrap_or_else(|| "null".to_string()))
    }

    fn demarshall(&self, json: &JsonValue, _: &mut MarshallingSession<'_>) -> Result<MValue> {
        Ok(json.as_f64().map(MValue::Float).unwrap_or(MValue::Null))
    }

    fn handles(&self, json: &JsonValue) -> bool {
        json.is_number()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanMarshaller;

impl Marshaller for BooleanMarshaller {
    fn type_id(&self) -> &str {
        "boolean"
    }

    fn marshall(&self, value: &MValue, _: &mut MarshallingSession<'_>) -> Result<String> {
        match value {
            MValue::Bool(b) => Ok(b.to_string()),
            _ => Ok("null".to_string()),
        }
    }

    fn demarshall(&self, json: &JsonValue, _: &mut MarshallingSession<'_>) -> Result<MValue> {
        Ok(json.as_bool().map(MValue::Bool).unwrap_or(MValue::Null))
    }

    fn handles(&self, json: &JsonValue) -> bool {
        json.is_boolean()
    }
}

/// Base64 text. Claims no shape: reachable through a type hint only.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesMarshaller;

impl Marshaller for BytesMarshaller {
    fn type_id(&self) -> &str {
        "bytes"
    }

    fn marshall(&self, value: &MValue, _: &mut MarshallingSession<'_>) -> Result<String> {
        match value {
            MValue::Bytes(data) => quote_json(&BASE64.encode(data)),
            _ => Ok("null".to_string()),
        }
    }

    fn demarshall(&self, json: &JsonValue, _: &mut MarshallingSession<'_>) -> Result<MValue> {
        let Some(text) = json.as_str() else {
            return Ok(MValue::Null);
        };
        BASE64
            .decode(text)
            .map(MValue::Bytes)
            .map_err(|e| MarshalError::InvalidValue(format!("bad base64: {e}")))
    }

    fn handles(&self, _: &JsonValue) -> bool {
        false
    }
}

/// RFC 3339 timestamps. Claims no shape: reachable through a type hint only.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeMarshaller;

impl Marshaller for TimeMarshaller {
    fn type_id(&self) -> &str {
        "time"
    }

    fn marshall(&self, value: &MValue, _: &mut MarshallingSession<'_>) -> Result<String> {
        match value {
            MValue::Time(t) => quote_json(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            _ => Ok("null".to_string()),
        }
    }

    fn demarshall(&self, json: &JsonValue, _: &mut MarshallingSession<'_>) -> Result<MValue> {
        let Some(text) = json.as_str() else {
            return Ok(MValue::Null);
        };
        DateTime::parse_from_rfc3339(text)
            .map(|t| MValue::Time(t.with_timezone(&Utc)))
            .map_err(|e| MarshalError::InvalidValue(format!("bad timestamp {text:?}: {e}")))
    }

    fn handles(&self, _: &JsonValue) -> bool {
        false
    }
}
