//! Typed record marshaller
//!
//! Records are JSON objects tagged with their type name. A record with an
//! id is written in full the first time a session sees it and as a
//! back-reference while it stays identical. A different record under the
//! same id is written in full again and replaces the tracked one:
//!
//! ```text
//! {"_type":"User","_id":"u1","name":"ann"}
//! {"_type":"User","_ref":"u1"}
//! ```

use crate::error::*;
use crate::marshaller::{quote_json, Marshaller};
use crate::session::MarshallingSession;
use crate::types::*;
use serde_json::Value as JsonValue;

pub const TYPE_KEY: &str = "_type";
pub const ID_KEY: &str = "_id";
pub const REF_KEY: &str = "_ref";

const RESERVED: [&str; 3] = [TYPE_KEY, ID_KEY, REF_KEY];

#[derive(Debug, Clone, Copy, Default)]
pub struct RecordMarshaller;

impl Marshaller for RecordMarshaller {
    fn type_id(&self) -> &str {
        "record"
    }

    fn marshall(&self, value: &MValue, session: &mut MarshallingSession<'_>) -> Result<String> {
        let record = match value {
            MValue::Record(record) => record,
            _ => return Ok("null".to_string()),
        };
        if let Some(f) = record.fields.iter().find(|f| RESERVED.contains(&f.name.as_str())) {
            return Err(MarshalError::ReservedKey(f.name.clone()));
        }

        let mut buf = String::from("{");
        buf.push_str(&quote_json(TYPE_KEY)?);
        buf.push(':');
        buf.push_str(&quote_json(&record.type_name)?);

        let tracked = session.opts().track_identity;
        if let Some(id) = &record.id {
            let same = session.lookup_object(&record.type_name, id) == Some(record);
            let key = if tracked && same {
                REF_KEY
            } else {
                ID_KEY
            };
            buf.push(',');
            buf.push_str(&quote_json(key)?);
            buf.push(':');
            buf.push_str(&quote_json(id)?);
            if key == REF_KEY {
                buf.push('}');
                return Ok(buf);
            }
        }

        for f in &record.fields {
            buf.push(',');
            buf.push_str(&quote_json(&f.name)?);
            buf.push(':');
            buf.push_str(&session.marshall(&f.value)?);
        }
        buf.push('}');

        // Tracked after the fields, matching the order a decoder sees them.
        if tracked {
            session.record_object(record);
        }
        Ok(buf)
    }

    fn demarshall(&self, json: &JsonValue, session: &mut MarshallingSession<'_>) -> Result<MValue> {
        let Some(obj) = json.as_object() else {
            return Ok(MValue::Null);
        };
        let Some(type_name) = obj.get(TYPE_KEY).and_then(JsonValue::as_str) else {
            return Ok(MValue::Null);
        };

        if let Some(reference) = obj.get(REF_KEY) {
            let id = reference.as_str().ok_or_else(|| {
                MarshalError::InvalidValue(format!("{REF_KEY} must be a string, got {reference}"))
            })?;
            return session
                .lookup_object(type_name, id)
                .cloned()
                .map(MValue::Record)
                .ok_or_else(|| MarshalError::UnknownReference {
                    type_name: type_name.to_string(),
                    id: id.to_string(),
                });
        }

        let id = match obj.get(ID_KEY) {
            None | Some(JsonValue::Null) => None,
            Some(JsonValue::String(id)) => Some(id.clone()),
            Some(other) => {
                return Err(MarshalError::InvalidValue(format!(
                    "{ID_KEY} must be a string, got {other}"
                )))
            }
        };

        let mut fields = Vec::with_capacity(obj.len());
        for (name, value) in obj {
            if RESERVED.contains(&name.as_str()) {
                continue;
            }
            fields.push(Field::new(name.clone(), session.demarshall(value, None)?));
        }

        let record = RecordValue {
            type_name: type_name.to_string(),
            id,
            fields,
        };
        if session.opts().track_identity {
            session.record_object(&record);
        }
        Ok(MValue::Record(record))
    }

    fn handles(&self, json: &JsonValue) -> bool {
        json.get(TYPE_KEY).is_some_and(JsonValue::is_string)
    }
}
