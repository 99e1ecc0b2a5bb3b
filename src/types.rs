//! Core value types

use chrono::{DateTime, Utc};

/// Value handled by the marshalling layer
#[derive(Debug, Clone)]
pub enum MValue {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (i64)
    Int(i64),
    /// Floating point value (f64)
    Float(f64),
    /// String value
    Str(String),
    /// Binary data (bytes)
    Bytes(Vec<u8>),
    /// Timestamp (UTC)
    Time(DateTime<Utc>),
    /// Ordered list of values
    List(Vec<MValue>),
    /// Associative collection; keys may be any value
    Map(Vec<MapEntry>),
    /// Typed record with named fields
    Record(RecordValue),
}

/// Map entry (key-value pair)
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    pub key: MValue,
    pub value: MValue,
}

impl MapEntry {
    pub fn new(key: impl Into<MValue>, value: impl Into<MValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Named record field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: MValue,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<MValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Typed record value
///
/// A record with an `id` takes part in identity tracking: within one
/// session it is written out once and referenced while it stays unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordValue {
    pub type_name: String,
    pub id: Option<String>,
    pub fields: Vec<Field>,
}

impl RecordValue {
    pub fn new(type_name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            type_name: type_name.into(),
            id: None,
            fields,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&MValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }
}

// ============================================================
// Builder functions
// ============================================================

impl MValue {
    pub fn null() -> Self {
        MValue::Null
    }

    pub fn bool(v: bool) -> Self {
        MValue::Bool(v)
    }

    pub fn int(v: i64) -> Self {
        MValue::Int(v)
    }

    pub fn float(v: f64) -> Self {
        MValue::Float(v)
    }

    pub fn str(v: impl Into<String>) -> Self {
        MValue::Str(v.into())
    }

    pub fn bytes(v: Vec<u8>) -> Self {
        MValue::Bytes(v)
    }

    pub fn time(v: DateTime<Utc>) -> Self {
        MValue::Time(v)
    }

    pub fn list(items: Vec<MValue>) -> Self {
        MValue::List(items)
    }

    /// Create a map value; later entries replace earlier ones with an equal key
    pub fn map(entries: Vec<MapEntry>) -> Self {
        let mut out = Vec::with_capacity(entries.len());
        for e in entries {
            insert_entry(&mut out, e.key, e.value);
        }
        MValue::Map(out)
    }

    pub fn record(type_name: impl Into<String>, fields: Vec<Field>) -> Self {
        MValue::Record(RecordValue::new(type_name, fields))
    }

    /// Canonical type identifier this value marshals under without a hint
    pub fn type_id(&self) -> &'static str {
        match self {
            MValue::Null => "null",
            MValue::Bool(_) => "boolean",
            MValue::Int(_) => "long",
            MValue::Float(_) => "double",
            MValue::Str(_) => "string",
            MValue::Bytes(_) => "bytes",
            MValue::Time(_) => "time",
            MValue::List(_) => "list",
            MValue::Map(_) => "map",
            MValue::Record(_) => "record",
        }
    }

    // ============================================================
    // Type checking
    // ============================================================

    pub fn is_null(&self) -> bool {
        matches!(self, MValue::Null)
    }

    pub fn is_str(&self) -> bool {
        matches!(self, MValue::Str(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, MValue::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, MValue::Map(_))
    }

    pub fn is_record(&self) -> bool {
        matches!(self, MValue::Record(_))
    }

    // ============================================================
    // Value extraction
    // ============================================================

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            MValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            MValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MValue::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            MValue::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&DateTime<Utc>> {
        match self {
            MValue::Time(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[MValue]> {
        match self {
            MValue::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[MapEntry]> {
        match self {
            MValue::Map(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordValue> {
        match self {
            MValue::Record(v) => Some(v),
            _ => None,
        }
    }

    /// Look up a map value by key
    pub fn get(&self, key: &MValue) -> Option<&MValue> {
        match self {
            MValue::Map(entries) => entries.iter().find(|e| &e.key == key).map(|e| &e.value),
            _ => None,
        }
    }
}

/// Insert into map entries, replacing the value of an equal key.
///
/// Keys are compared by a linear scan, so building a map of n entries
/// this way costs O(n²). Keys need not be hashable (floats, maps).
pub fn insert_entry(entries: &mut Vec<MapEntry>, key: MValue, value: MValue) {
    match entries.iter_mut().find(|e| e.key == key) {
        Some(existing) => existing.value = value,
        None => entries.push(MapEntry { key, value }),
    }
}

/// Map equality ignores entry order
impl PartialEq for MValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MValue::Null, MValue::Null) => true,
            (MValue::Bool(a), MValue::Bool(b)) => a == b,
            (MValue::Int(a), MValue::Int(b)) => a == b,
            (MValue::Float(a), MValue::Float(b)) => a == b,
            (MValue::Str(a), MValue::Str(b)) => a == b,
            (MValue::Bytes(a), MValue::Bytes(b)) => a == b,
            (MValue::Time(a), MValue::Time(b)) => a == b,
            (MValue::List(a), MValue::List(b)) => a == b,
            (MValue::Map(a), MValue::Map(b)) => {
                a.len() == b.len()
                    && a.iter().all(|e| {
                        b.iter()
                            .find(|o| o.key == e.key)
                            .is_some_and(|o| o.value == e.value)
                    })
            }
            (MValue::Record(a), MValue::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for MValue {
    fn from(v: &str) -> Self {
        MValue::Str(v.to_string())
    }
}

impl From<String> for MValue {
    fn from(v: String) -> Self {
        MValue::Str(v)
    }
}

impl From<i64> for MValue {
    fn from(v: i64) -> Self {
        MValue::Int(v)
    }
}

impl From<i32> for MValue {
    fn from(v: i32) -> Self {
        MValue::Int(v.into())
    }
}

impl From<f64> for MValue {
    fn from(v: f64) -> Self {
        MValue::Float(v)
    }
}

impl From<bool> for MValue {
    fn from(v: bool) -> Self {
        MValue::Bool(v)
    }
}

/// Helper to create a map entry
pub fn entry(key: impl Into<MValue>, value: impl Into<MValue>) -> MapEntry {
    MapEntry::new(key, value)
}

/// Helper to create a record field
pub fn field(name: impl Into<String>, value: impl Into<MValue>) -> Field {
    Field::new(name, value)
}
