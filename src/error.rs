//! Error types for marshalling

use thiserror::Error;

/// Errors that can occur while marshalling or demarshalling
#[derive(Error, Debug)]
pub enum MarshalError {
    #[error("Unresolved type: no marshaller claims a JSON {shape}")]
    UnresolvedType { shape: &'static str },

    #[error("Unknown type: {0}")]
    UnknownType(String),

    #[error("Malformed embedded key {key:?}: {source}")]
    MalformedEmbeddedKey {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Reserved key: {0}")]
    ReservedKey(String),

    #[error("Unknown reference: {type_name}#{id}")]
    UnknownReference { type_name: String, id: String },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MarshalError>;
