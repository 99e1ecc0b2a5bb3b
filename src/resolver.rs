//! Type resolution for incoming JSON values

use crate::error::*;
use crate::marshaller::json_shape;
use crate::registry::MarshallerRegistry;
use serde_json::Value as JsonValue;

/// Decides which canonical type identifier handles a JSON value
pub trait TypeResolver: Send + Sync {
    fn determine_type(
        &self,
        registry: &MarshallerRegistry,
        hint: Option<&str>,
        json: &JsonValue,
    ) -> Result<String>;
}

/// Two-tier resolver: a declared type hint wins; otherwise the first
/// registered marshaller whose shape predicate accepts the value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeResolver;

impl TypeResolver for ShapeResolver {
    fn determine_type(
        &self,
        registry: &MarshallerRegistry,
        hint: Option<&str>,
        json: &JsonValue,
    ) -> Result<String> {
        if let Some(hint) = hint {
            return Ok(registry.canonical_type(hint).to_string());
        }

        match registry.iter().find(|m| m.handles(json)) {
            Some(m) => Ok(m.type_id().to_string()),
            None => {
                let shape = json_shape(json);
                tracing::debug!(shape, "no marshaller claims value");
                Err(MarshalError::UnresolvedType { shape })
            }
        }
    }
}
