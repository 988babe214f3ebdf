//! Type-tagged record encoding.
//!
//! Client and consensus states of every light-client family share key space in
//! the host store, so each record is wrapped in an [`Any`] envelope naming its
//! family. Decoding checks the tag before touching the payload; a record
//! written by one family can never be silently read as another.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Failed to encode {type_url}: {reason}")]
    Encode { type_url: String, reason: String },

    #[error("Malformed record: {0}")]
    Malformed(String),

    #[error("Record type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
}

/// Envelope carrying a record's family tag next to its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Any {
    pub type_url: String,
    pub value: Vec<u8>,
}

impl Any {
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        bincode::deserialize(bytes).map_err(|e| CodecError::Malformed(e.to_string()))
    }
}

/// A record that is persisted inside an [`Any`] envelope.
pub trait TypedRecord: Serialize + DeserializeOwned {
    const TYPE_URL: &'static str;

    fn encode_any(&self) -> Result<Vec<u8>, CodecError> {
        let encode_err = |e: bincode::Error| CodecError::Encode {
            type_url: Self::TYPE_URL.to_string(),
            reason: e.to_string(),
        };
        let any = Any {
            type_url: Self::TYPE_URL.to_string(),
            value: bincode::serialize(self).map_err(encode_err)?,
        };
        bincode::serialize(&any).map_err(encode_err)
    }

    fn decode_any(bytes: &[u8]) -> Result<Self, CodecError> {
        let any = Any::decode(bytes)?;
        if any.type_url != Self::TYPE_URL {
            return Err(CodecError::TypeMismatch {
                expected: Self::TYPE_URL.to_string(),
                found: any.type_url,
            });
        }
        bincode::deserialize(&any.value).map_err(|e| CodecError::Malformed(e.to_string()))
    }
}
