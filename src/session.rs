//! Per-operation marshalling context

use crate::error::*;
use crate::marshaller::Marshaller;
use crate::opts::MarshalOpts;
use crate::registry::MarshallerRegistry;
use crate::resolver::{ShapeResolver, TypeResolver};
use crate::types::*;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

static SHAPE_RESOLVER: ShapeResolver = ShapeResolver;

/// Context threading the registry and resolver through one encode or
/// decode call tree.
///
/// A session is created per top-level operation and dropped afterwards.
/// It owns the identity table for records, so it must not be shared
/// between concurrent operations.
pub struct MarshallingSession<'r> {
    registry: &'r MarshallerRegistry,
    resolver: &'r dyn TypeResolver,
    objects: HashMap<(String, String), RecordValue>,
}

/// Open a session bound to `registry`
pub fn create_session(registry: &MarshallerRegistry) -> MarshallingSession<'_> {
    MarshallingSession::new(registry)
}

impl<'r> MarshallingSession<'r> {
    pub fn new(registry: &'r MarshallerRegistry) -> Self {
        Self::with_resolver(registry, &SHAPE_RESOLVER)
    }

    pub fn with_resolver(registry: &'r MarshallerRegistry, resolver: &'r dyn TypeResolver) -> Self {
        Self {
            registry,
            resolver,
            objects: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &'r MarshallerRegistry {
        self.registry
    }

    pub fn opts(&self) -> &'r MarshalOpts {
        self.registry.opts()
    }

    /// Encode a value, dispatching on its own type
    pub fn marshall(&mut self, value: &MValue) -> Result<String> {
        self.marshall_as(value, None)
    }

    /// Encode a value with the marshaller bound to `hint`, if given
    pub fn marshall_as(&mut self, value: &MValue, hint: Option<&str>) -> Result<String> {
        if value.is_null() && hint.is_none() {
            return Ok("null".to_string());
        }
        let type_id = hint.unwrap_or_else(|| value.type_id());
        let marshaller = self.marshaller_for(type_id)?;
        tracing::trace!(type_id = marshaller.type_id(), "marshall");
        marshaller.marshall(value, self)
    }

    /// Decode a parsed JSON value, using `hint` when the type is known
    pub fn demarshall(&mut self, json: &JsonValue, hint: Option<&str>) -> Result<MValue> {
        if json.is_null() && hint.is_none() {
            return Ok(MValue::Null);
        }
        let type_id = self.determine_type_for(hint, json)?;
        let marshaller = self.marshaller_for(&type_id)?;
        tracing::trace!(type_id = marshaller.type_id(), "demarshall");
        marshaller.demarshall(json, self)
    }

    /// Parse JSON text and decode it
    pub fn demarshall_str(&mut self, text: &str, hint: Option<&str>) -> Result<MValue> {
        let json: JsonValue = serde_json::from_str(text)?;
        self.demarshall(&json, hint)
    }

    pub fn determine_type_for(&self, hint: Option<&str>, json: &JsonValue) -> Result<String> {
        self.resolver.determine_type(self.registry, hint, json)
    }

    pub fn marshaller_for(&self, type_id: &str) -> Result<&'r dyn Marshaller> {
        let registry: &'r MarshallerRegistry = self.registry;
        registry.lookup_by_type(type_id)
    }

    // ============================================================
    // Object identity
    // ============================================================

    /// Whether a record with this type and id was seen in this session
    pub fn has_object(&self, type_name: &str, id: &str) -> bool {
        self.objects
            .contains_key(&(type_name.to_string(), id.to_string()))
    }

    /// Remember an identified record; records without an id are ignored
    pub fn record_object(&mut self, record: &RecordValue) {
        if let Some(id) = &record.id {
            self.objects
                .insert((record.type_name.clone(), id.clone()), record.clone());
        }
    }

    pub fn lookup_object(&self, type_name: &str, id: &str) -> Option<&RecordValue> {
        self.objects.get(&(type_name.to_string(), id.to_string()))
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_passthrough() {
        let registry = MarshallerRegistry::with_defaults();
        let mut session = create_session(&registry);
        assert_eq!(session.marshall(&MValue::Null).unwrap(), "null");
        assert_eq!(session.demarshall(&json!(null), None).unwrap(), MValue::Null);
        assert_eq!(session.demarshall(&json!(null), Some("map")).unwrap(), MValue::Null);
    }

    #[test]
    fn test_unknown_hint_fails() {
        let registry = MarshallerRegistry::with_defaults();
        let mut session = create_session(&registry);
        let err = session.demarshall(&json!({"a": 1}), Some("no-such-type")).unwrap_err();
        assert!(matches!(err, MarshalError::UnknownType(_)));

        let err = session.marshall_as(&MValue::int(1), Some("no-such-type")).unwrap_err();
        assert!(matches!(err, MarshalError::UnknownType(_)));
    }

    #[test]
    fn test_unknown_value_type_fails() {
        let registry = MarshallerRegistry::new();
        let mut session = create_session(&registry);
        let err = session.marshall(&MValue::int(1)).unwrap_err();
        assert!(matches!(err, MarshalError::UnknownType(ref t) if t == "long"));
    }

    #[test]
    fn test_parse_error_propagates() {
        let registry = MarshallerRegistry::with_defaults();
        let mut session = create_session(&registry);
        let err = session.demarshall_str("{not json", None).unwrap_err();
        assert!(matches!(err, MarshalError::Json(_)));
    }

    #[test]
    fn test_identity_table() {
        let registry = MarshallerRegistry::with_defaults();
        let mut session = create_session(&registry);
        let rec = RecordValue::new("User", vec![field("name", "ann")]).with_id("u1");
        assert!(!session.has_object("User", "u1"));
        session.record_object(&rec);
        session.record_object(&RecordValue::new("User", vec![]));
        assert!(session.has_object("User", "u1"));
        assert_eq!(session.lookup_object("User", "u1"), Some(&rec));
        assert_eq!(session.object_count(), 1);
    }
}
