//! Ordered sequence marshaller

use crate::error::*;
use crate::marshaller::Marshaller;
use crate::session::MarshallingSession;
use crate::types::MValue;
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Copy, Default)]
pub struct ListMarshaller;

impl Marshaller for ListMarshaller {
    fn type_id(&self) -> &str {
        "list"
    }

    fn marshall(&self, value: &MValue, session: &mut MarshallingSession<'_>) -> Result<String> {
        let items = match value {
            MValue::List(items) => items,
            _ => return Ok("null".to_string()),
        };
        let mut buf = String::from("[");
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                buf.push(',');
            }
            buf.push_str(&session.marshall(item)?);
        }
        buf.push(']');
        Ok(buf)
    }

    fn demarshall(&self, json: &JsonValue, session: &mut MarshallingSession<'_>) -> Result<MValue> {
        match json.as_array() {
            Some(items) => items
                .iter()
                .map(|item| session.demarshall(item, None))
                .collect::<Result<Vec<_>>>()
                .map(MValue::List),
            None => Ok(MValue::Null),
        }
    }

    fn handles(&self, json: &JsonValue) -> bool {
        json.is_array()
    }
}
