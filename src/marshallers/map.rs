//! Associative-collection marshaller with embedded non-string keys
//!
//! String keys are written as ordinary object keys. Any other key is
//! marshalled through the session and its JSON text is written as a string
//! key behind the embed sentinel:
//!
//! ```text
//! {1: "a", "x": "b"}  ->  {"${$JSON$}$::1":"a","x":"b"}
//! ```
//!
//! A literal string key that starts with the sentinel, or that equals the
//! record tag `_type`, is written in embedded form as a JSON string
//! document so that it decodes back to the same string.
//!
//! Embedded keys are decoded without a type hint. `Bytes` and `Time` keys
//! claim no JSON shape, so they come back as `Str`; a map holding both
//! `Bytes([1])` and `"AQ=="` as keys collapses to a single entry.

use super::record::TYPE_KEY;
use crate::error::*;
use crate::marshaller::{quote_json, Marshaller};
use crate::opts::{KeyCollision, MarshalOpts};
use crate::session::MarshallingSession;
use crate::types::*;
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Copy, Default)]
pub struct MapMarshaller;

impl Marshaller for MapMarshaller {
    fn type_id(&self) -> &str {
        "map"
    }

    fn marshall(&self, value: &MValue, session: &mut MarshallingSession<'_>) -> Result<String> {
        let entries = match value {
            MValue::Map(entries) => entries,
            _ => return Ok("null".to_string()),
        };
        let opts = session.opts();

        let mut buf = String::from("{");
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                buf.push(',');
            }
            buf.push_str(&marshall_key(&entry.key, opts, session)?);
            buf.push(':');
            if entry.value.is_null() {
                buf.push_str("null");
            } else {
                buf.push_str(&session.marshall(&entry.value)?);
            }
        }
        buf.push('}');
        Ok(buf)
    }

    fn demarshall(&self, json: &JsonValue, session: &mut MarshallingSession<'_>) -> Result<MValue> {
        let obj = match json.as_object() {
            Some(obj) => obj,
            None => {
                tracing::trace!("map marshaller given a non-object, no map present");
                return Ok(MValue::Null);
            }
        };
        let sentinel = session.opts().embed_sentinel.as_str();

        let mut entries = Vec::with_capacity(obj.len());
        for (key, value) in obj {
            let key = match key.strip_prefix(sentinel) {
                Some(doc) => {
                    let parsed: JsonValue = serde_json::from_str(doc).map_err(|source| {
                        MarshalError::MalformedEmbeddedKey {
                            key: key.clone(),
                            source,
                        }
                    })?;
                    session.demarshall(&parsed, None)?
                }
                None => MValue::Str(key.clone()),
            };
            let value = session.demarshall(value, None)?;
            insert_entry(&mut entries, key, value);
        }
        Ok(MValue::Map(entries))
    }

    fn handles(&self, json: &JsonValue) -> bool {
        json.is_object()
    }
}

fn marshall_key(
    key: &MValue,
    opts: &MarshalOpts,
    session: &mut MarshallingSession<'_>,
) -> Result<String> {
    if let MValue::Str(s) = key {
        if s.starts_with(&opts.embed_sentinel) {
            if opts.key_collision == KeyCollision::Reject {
                return Err(MarshalError::ReservedKey(s.clone()));
            }
        } else if s != TYPE_KEY {
            return quote_json(s);
        }
    }
    let doc = session.marshall(key)?;
    quote_json(&format!("{}{}", opts.embed_sentinel, doc))
}
