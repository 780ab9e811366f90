//! Query identifiers

use std::fmt;

/// Identifier of one analysis invocation, based on UUIDv7
///
/// Only used to correlate audit records; it is never part of the formatted
/// output, which stays identical across repeated invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryId(u128);

impl QueryId {
    /// Generate a new UUIDv7-based QueryId
    ///
    /// # Examples
    ///
    /// ```
    /// use lexguard_domain::QueryId;
    ///
    /// let id = QueryId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Parse a QueryId from a UUID string
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid UUID string: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for QueryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: string form parses back to the same id
        #[test]
        fn test_query_id_string_roundtrip(value: u128) {
            let text = uuid::Uuid::from_u128(value).to_string();
            match QueryId::from_string(&text) {
                Ok(parsed) => {
                    prop_assert_eq!(parsed.value(), value);
                    prop_assert_eq!(parsed.to_string(), text);
                }
                Err(e) => return Err(TestCaseError::fail(e)),
            }
        }
    }
}
