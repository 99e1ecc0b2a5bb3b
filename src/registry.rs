//! Registry mapping canonical type identifiers to marshallers

use crate::error::*;
use crate::marshaller::Marshaller;
use crate::marshallers::*;
use crate::opts::MarshalOpts;
use crate::resolver::{ShapeResolver, TypeResolver};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;

/// Process-wide table of marshallers.
///
/// Built once at startup and read-only afterwards; share it by reference
/// (or behind an `Arc`) with every session. Registration order is the
/// priority order used when resolving a type from JSON shape alone.
pub struct MarshallerRegistry {
    marshallers: Vec<Box<dyn Marshaller>>,
    by_type: HashMap<String, usize>,
    aliases: HashMap<String, String>,
    opts: MarshalOpts,
}

impl Default for MarshallerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MarshallerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarshallerRegistry")
            .field("types", &self.type_ids().collect::<Vec<_>>())
            .field("aliases", &self.aliases)
            .field("opts", &self.opts)
            .finish()
    }
}

impl MarshallerRegistry {
    /// Empty registry with default options
    pub fn new() -> Self {
        Self::empty(MarshalOpts::default())
    }

    /// Empty registry with custom options
    pub fn with_opts(opts: MarshalOpts) -> Result<Self> {
        opts.validate()?;
        Ok(Self::empty(opts))
    }

    /// Registry populated with the built-in marshallers and aliases
    pub fn with_defaults() -> Self {
        Self::populate(Self::new())
    }

    pub fn with_defaults_and_opts(opts: MarshalOpts) -> Result<Self> {
        Self::with_opts(opts).map(Self::populate)
    }

    fn empty(opts: MarshalOpts) -> Self {
        Self {
            marshallers: Vec::new(),
            by_type: HashMap::new(),
            aliases: HashMap::new(),
            opts,
        }
    }

    fn populate(mut registry: Self) -> Self {
        // Records must be probed before maps: both are JSON objects.
        registry.register(RecordMarshaller);
        registry.register(MapMarshaller);
        registry.register(ListMarshaller);
        registry.register(StringMarshaller);
        registry.register(LongMarshaller);
        registry.register(DoubleMarshaller);
        registry.register(BooleanMarshaller);
        registry.register(BytesMarshaller);
        registry.register(TimeMarshaller);

        for alias in ["HashMap", "LinkedHashMap", "AbstractMap", "BTreeMap"] {
            registry.register_alias(alias, "map");
        }
        for alias in ["Vec", "ArrayList"] {
            registry.register_alias(alias, "list");
        }
        registry.register_alias("String", "string");
        for alias in ["i64", "Integer", "Long"] {
            registry.register_alias(alias, "long");
        }
        for alias in ["f64", "Double"] {
            registry.register_alias(alias, "double");
        }
        for alias in ["bool", "Boolean"] {
            registry.register_alias(alias, "boolean");
        }
        registry.register_alias("DateTime", "time");
        registry
    }

    /// Bind a marshaller under its type identifier.
    ///
    /// Re-registering an identifier replaces the binding but keeps its
    /// original probe position. An alias with the same name is dropped so
    /// the latest registration wins.
    pub fn register(&mut self, marshaller: impl Marshaller + 'static) {
        let type_id = marshaller.type_id().to_string();
        if let Some(target) = self.aliases.remove(&type_id) {
            tracing::debug!(type_id = %type_id, alias_of = %target, "binding shadows alias");
        }
        match self.by_type.get(&type_id) {
            Some(&idx) => {
                tracing::debug!(type_id = %type_id, "replacing marshaller");
                self.marshallers[idx] = Box::new(marshaller);
            }
            None => {
                self.by_type.insert(type_id, self.marshallers.len());
                self.marshallers.push(Box::new(marshaller));
            }
        }
    }

    /// Make `source_type` resolve to the marshaller bound to `type_id`.
    ///
    /// Aliases are consulted before direct bindings, so aliasing an
    /// identifier that is already bound redirects it.
    pub fn register_alias(&mut self, source_type: impl Into<String>, type_id: impl Into<String>) {
        self.aliases.insert(source_type.into(), type_id.into());
    }

    /// Resolve an alias to its canonical identifier
    pub fn canonical_type<'a>(&'a self, type_id: &'a str) -> &'a str {
        self.aliases.get(type_id).map(String::as_str).unwrap_or(type_id)
    }

    pub fn lookup_by_type(&self, type_id: &str) -> Result<&dyn Marshaller> {
        let canonical = self.canonical_type(type_id);
        self.by_type
            .get(canonical)
            .map(|&idx| self.marshallers[idx].as_ref())
            .ok_or_else(|| MarshalError::UnknownType(type_id.to_string()))
    }

    /// Pick a marshaller for a JSON value, preferring the hint when given
    pub fn lookup_by_shape(&self, json: &JsonValue, hint: Option<&str>) -> Result<&dyn Marshaller> {
        let type_id = ShapeResolver.determine_type(self, hint, json)?;
        self.lookup_by_type(&type_id)
    }

    /// Marshallers in probe priority order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Marshaller> {
        self.marshallers.iter().map(|m| m.as_ref())
    }

    pub fn type_ids(&self) -> impl Iterator<Item = &str> {
        self.marshallers.iter().map(|m| m.type_id())
    }

    pub fn opts(&self) -> &MarshalOpts {
        &self.opts
    }
}
