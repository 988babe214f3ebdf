// HOST IDENTIFIERS
// Validated port, channel, connection and client identifiers
//
// INVARIANTS:
// 1. Identifiers are never empty and never contain a path separator
// 2. Only ASCII alphanumerics and `._+-#[]<>` are accepted
// 3. Each identifier family has its own length bounds
//
// Invariant 1 is what keeps the key paths in `path` collision-free.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("Identifier cannot be blank")]
    Empty,

    #[error("Identifier {id} contains a path separator")]
    ContainsSeparator { id: String },

    #[error("Identifier {id} has length {length}, must be between {min} and {max}")]
    InvalidLength {
        id: String,
        length: usize,
        min: usize,
        max: usize,
    },

    #[error("Identifier {id} contains invalid character {ch:?}")]
    InvalidCharacter { id: String, ch: char },
}

const PORT_ID_BOUNDS: (usize, usize) = (2, 128);
const CHANNEL_ID_BOUNDS: (usize, usize) = (8, 64);
const CONNECTION_ID_BOUNDS: (usize, usize) = (10, 64);
const CLIENT_ID_BOUNDS: (usize, usize) = (9, 64);

fn is_valid_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '+' | '-' | '#' | '[' | ']' | '<' | '>')
}

/// Validate an identifier against the host character set and length bounds.
pub fn validate_identifier(id: &str, min: usize, max: usize) -> Result<(), IdentifierError> {
    if id.trim().is_empty() {
        return Err(IdentifierError::Empty);
    }
    if id.contains('/') {
        return Err(IdentifierError::ContainsSeparator { id: id.to_string() });
    }
    let length = id.len();
    if length < min || length > max {
        return Err(IdentifierError::InvalidLength {
            id: id.to_string(),
            length,
            min,
            max,
        });
    }
    if let Some(ch) = id.chars().find(|ch| !is_valid_char(*ch)) {
        return Err(IdentifierError::InvalidCharacter { id: id.to_string(), ch });
    }
    Ok(())
}

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident, $bounds:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                validate_identifier(s, $bounds.0, $bounds.1)?;
                Ok($name(s.to_string()))
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentifierError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                validate_identifier(&value, $bounds.0, $bounds.1)?;
                Ok($name(value))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

identifier!(
    /// Port an application module is bound to
    PortId,
    PORT_ID_BOUNDS
);
identifier!(
    /// Channel identifier, `channel-{n}` when generated by the host
    ChannelId,
    CHANNEL_ID_BOUNDS
);
identifier!(
    /// Connection identifier, `connection-{n}` when generated by the host
    ConnectionId,
    CONNECTION_ID_BOUNDS
);
identifier!(
    /// Light client identifier, `{client_type}-{n}`
    ClientId,
    CLIENT_ID_BOUNDS
);

impl ChannelId {
    pub fn new(sequence: u64) -> Self {
        ChannelId(format!("channel-{sequence}"))
    }
}

impl ConnectionId {
    pub fn new(sequence: u64) -> Self {
        ConnectionId(format!("connection-{sequence}"))
    }
}

impl ClientId {
    /// Build `{client_type}-{sequence}`, validating the result.
    pub fn new(client_type: &str, sequence: u64) -> Result<Self, IdentifierError> {
        format!("{client_type}-{sequence}").parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_identifiers_are_valid() {
        assert_eq!(ChannelId::new(7).as_str(), "channel-7");
        assert_eq!(ConnectionId::new(0).as_str(), "connection-0");
        assert_eq!(ClientId::new("07-tendermint", 3).unwrap().as_str(), "07-tendermint-3");
        assert!("channel-7".parse::<ChannelId>().is_ok());
    }

    #[test]
    fn test_rejects_separator() {
        let err = "transfer/evil".parse::<PortId>().unwrap_err();
        assert!(matches!(err, IdentifierError::ContainsSeparator { .. }));
    }

    #[test]
    fn test_rejects_out_of_bounds_length() {
        assert!(matches!(
            "chan-1".parse::<ChannelId>(),
            Err(IdentifierError::InvalidLength { min: 8, max: 64, .. })
        ));
        assert!(matches!("p".parse::<PortId>(), Err(IdentifierError::InvalidLength { .. })));
        assert!(matches!("".parse::<PortId>(), Err(IdentifierError::Empty)));
    }

    #[test]
    fn test_rejects_invalid_character() {
        let err = "port a".parse::<PortId>().unwrap_err();
        assert_eq!(err, IdentifierError::InvalidCharacter { id: "port a".into(), ch: ' ' });
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Result<PortId, _> = serde_json::from_str("\"transfer\"");
        assert!(ok.is_ok());
        let bad: Result<PortId, _> = serde_json::from_str("\"a/b\"");
        assert!(bad.is_err());
    }
}
