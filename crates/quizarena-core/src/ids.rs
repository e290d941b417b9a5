//! Identity newtypes.
//!
//! `RoomId` and `UserId` wrap `u64` so the two can't be mixed up in a
//! signature, and so logging via `Display` stays uniform. `UserId` is
//! opaque to the engine — identity and display names come from the host
//! application.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A unique identifier for an arena room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

/// A stable, externally supplied player identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// A six-character room join code.
///
/// Codes are stored normalized to uppercase; [`JoinCode::parse`] accepts
/// lowercase input so players can type codes however they like.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JoinCode(String);

impl JoinCode {
    /// Length of every join code.
    pub const LEN: usize = 6;

    /// Wraps an already-normalized code. Callers outside the registry
    /// should prefer [`JoinCode::parse`].
    pub fn from_normalized(code: String) -> Self {
        debug_assert!(code.chars().all(|c| !c.is_ascii_lowercase()));
        Self(code)
    }

    /// Normalizes user input (trim + uppercase) into a join code.
    ///
    /// Returns `None` when the input is not exactly [`Self::LEN`]
    /// alphanumeric characters after trimming.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.len() != Self::LEN
            || !trimmed.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return None;
        }
        Some(Self(trimmed.to_ascii_uppercase()))
    }

    /// The normalized code text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JoinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_plain_numbers() {
        assert_eq!(serde_json::to_string(&RoomId(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&UserId(42)).unwrap(), "42");
    }

    #[test]
    fn test_id_display() {
        assert_eq!(RoomId(3).to_string(), "R-3");
        assert_eq!(UserId(9).to_string(), "U-9");
    }

    #[test]
    fn test_join_code_parse_normalizes_case() {
        let code = JoinCode::parse("ab3xk9").unwrap();
        assert_eq!(code.as_str(), "AB3XK9");
        assert_eq!(code, JoinCode::parse(" AB3xK9 ").unwrap());
    }

    #[test]
    fn test_join_code_parse_rejects_bad_input() {
        assert!(JoinCode::parse("SHORT").is_none());
        assert!(JoinCode::parse("TOOLONG7").is_none());
        assert!(JoinCode::parse("AB-3K9").is_none());
        assert!(JoinCode::parse("").is_none());
    }
}
