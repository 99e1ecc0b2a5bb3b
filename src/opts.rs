//! Marshalling options
//!
//! Both ends of a boundary must run with the same options; they are fixed
//! on the registry and read by every session bound to it.

use crate::error::*;
use serde::{Deserialize, Serialize};

/// Default prefix marking an object key as an embedded JSON document
pub const EMBEDDED_JSON: &str = "${$JSON$}$::";

/// What to do with a literal string key that starts with the sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyCollision {
    /// Write the key in embedded form as a JSON string document
    #[default]
    Escape,
    /// Fail with `MarshalError::ReservedKey`
    Reject,
}

/// Options for marshalling sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarshalOpts {
    /// Prefix marking embedded-key documents
    pub embed_sentinel: String,
    /// Handling of literal keys colliding with the sentinel
    pub key_collision: KeyCollision,
    /// Write repeated identified records as back-references
    pub track_identity: bool,
}

impl Default for MarshalOpts {
    fn default() -> Self {
        Self {
            embed_sentinel: EMBEDDED_JSON.to_string(),
            key_collision: KeyCollision::Escape,
            track_identity: true,
        }
    }
}

impl MarshalOpts {
    /// Options that refuse sentinel-prefixed literal keys
    pub fn strict() -> Self {
        Self {
            key_collision: KeyCollision::Reject,
            ..Self::default()
        }
    }

    /// Options with identity tracking disabled
    pub fn no_identity() -> Self {
        Self {
            track_identity: false,
            ..Self::default()
        }
    }

    /// Load options from JSON text; missing fields take their defaults
    pub fn from_json(text: &str) -> Result<Self> {
        let opts: MarshalOpts = serde_json::from_str(text)?;
        opts.validate()?;
        Ok(opts)
    }

    /// Reject options no registry can work with
    pub fn validate(&self) -> Result<()> {
        if self.embed_sentinel.is_empty() {
            return Err(MarshalError::InvalidValue(
                "embed_sentinel must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_partial() {
        let opts = MarshalOpts::from_json(r#"{"key_collision": "reject"}"#).unwrap();
        assert_eq!(opts.key_collision, KeyCollision::Reject);
        assert_eq!(opts.embed_sentinel, EMBEDDED_JSON);
        assert!(opts.track_identity);
    }

    #[test]
    fn test_from_json_empty_sentinel() {
        let err = MarshalOpts::from_json(r#"{"embed_sentinel": ""}"#).unwrap_err();
        assert!(matches!(err, MarshalError::InvalidValue(_)));
    }

    #[test]
    fn test_validate() {
        assert!(MarshalOpts::default().validate().is_ok());
        let opts = MarshalOpts {
            embed_sentinel: String::new(),
            ..MarshalOpts::default()
        };
        assert!(matches!(opts.validate(), Err(MarshalError::InvalidValue(_))));
    }

    #[test]
    fn test_presets() {
        assert_eq!(MarshalOpts::strict().key_collision, KeyCollision::Reject);
        assert!(!MarshalOpts::no_identity().track_identity);
    }
}
