use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeightError {
    #[error("Height {0} is not of the form <revision_number>-<revision_height>")]
    InvalidFormat(String),
}

/// Height on a counterparty chain.
///
/// Ordered by revision number first, so any height of a later revision is
/// greater than every height of an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Height {
    /// Incremented each time the chain restarts with a new chain ID
    pub revision_number: u64,
    /// Block height within the revision
    pub revision_height: u64,
}

impl Height {
    pub fn new(revision_number: u64, revision_height: u64) -> Self {
        Height {
            revision_number,
            revision_height,
        }
    }

    /// Next block height in the same revision, `None` once the revision is exhausted
    pub fn increment(&self) -> Option<Self> {
        self.revision_height.checked_add(1).map(|revision_height| Height {
            revision_number: self.revision_number,
            revision_height,
        })
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.revision_number, self.revision_height)
    }
}

impl FromStr for Height {
    type Err = HeightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (number, height) = s
            .split_once('-')
            .ok_or_else(|| HeightError::InvalidFormat(s.to_string()))?;
        let revision_number = number
            .parse()
            .map_err(|_| HeightError::InvalidFormat(s.to_string()))?;
        let revision_height = height
            .parse()
            .map_err(|_| HeightError::InvalidFormat(s.to_string()))?;
        Ok(Height::new(revision_number, revision_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ordering_is_revision_first() {
        assert!(Height::new(1, 0) > Height::new(0, 1_000_000));
        assert!(Height::new(1, 5) < Height::new(1, 6));
    }

    #[test]
    fn test_increment_stays_in_revision() {
        let h = Height::new(2, 10);
        assert_eq!(h.increment(), Some(Height::new(2, 11)));
        assert_eq!(Height::new(2, u64::MAX).increment(), None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("10".parse::<Height>().is_err());
        assert!("a-b".parse::<Height>().is_err());
        assert!("1-".parse::<Height>().is_err());
    }

    proptest! {
        #[test]
        fn prop_display_parse(number in any::<u64>(), height in any::<u64>()) {
            let h = Height::new(number, height);
            prop_assert_eq!(h.to_string().parse::<Height>().unwrap(), h);
        }
    }
}
