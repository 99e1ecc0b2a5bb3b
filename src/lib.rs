//! Type-directed JSON marshalling
//!
//! Values are encoded to JSON text and decoded back through a registry of
//! marshallers, one per canonical type identifier. A per-operation
//! session routes every nested value through the same dispatch, which is
//! what lets maps carry keys that are not strings: such keys are
//! marshalled themselves and embedded behind a sentinel prefix.
//!
//! # Example
//!
//! ```rust
//! use marshal_codec::{demarshall, entry, marshall, MValue, MarshallerRegistry};
//!
//! let registry = MarshallerRegistry::with_defaults();
//! let map = MValue::map(vec![entry(1, "a"), entry("x", "b")]);
//!
//! let text = marshall(&registry, &map).unwrap();
//! assert_eq!(text, r#"{"${$JSON$}$::1":"a","x":"b"}"#);
//!
//! let back = demarshall(&registry, &text, None).unwrap();
//! assert_eq!(back, map);
//! ```

mod error;
mod json_bridge;
mod marshaller;
mod marshallers;
mod opts;
mod registry;
mod resolver;
mod session;
mod types;

pub use error::*;
pub use json_bridge::*;
pub use marshaller::*;
pub use marshallers::*;
pub use opts::*;
pub use registry::*;
pub use resolver::*;
pub use session::*;
pub use types::*;

#[cfg(test)]
mod tests;
