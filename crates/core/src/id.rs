//! Strongly-typed identifiers.

use serde::{Deserialize, Serialize};

/// Primary key of a row in the `users` table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i32> for UserId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_plain_number() {
        assert_eq!(UserId::from(42).to_string(), "42");
        assert_eq!(UserId::from(-7).to_string(), "-7");
    }

    #[test]
    fn serializes_transparently() {
        assert_eq!(serde_json::to_string(&UserId::from(42)).unwrap(), "42");
    }
}
