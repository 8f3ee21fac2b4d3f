//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Length of a room code.
pub const ROOM_CODE_LEN: usize = 4;

/// Alphabet room codes are drawn from.
pub const ROOM_CODE_ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Maximum number of characters in a display name.
pub const DISPLAY_NAME_MAX_CHARS: usize = 32;

/// Maximum length of a session token accepted from a client.
pub const SESSION_TOKEN_MAX_LEN: usize = 64;

/// Session token value object.
///
/// Opaque bearer credential identifying a player across reconnects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(String);

impl SessionToken {
    /// Create a new SessionToken.
    ///
    /// # Arguments
    ///
    /// * `token` - The token string as presented by a client
    ///
    /// # Returns
    ///
    /// A Result containing the SessionToken or an error if validation fails
    pub fn new(token: String) -> Result<Self, ValueObjectError> {
        if token.is_empty() {
            return Err(ValueObjectError::SessionTokenEmpty);
        }
        let len = token.len();
        if len > SESSION_TOKEN_MAX_LEN {
            return Err(ValueObjectError::SessionTokenTooLong {
                max: SESSION_TOKEN_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(token))
    }

    /// Wrap a token produced by the generator.
    pub(super) fn from_generated(token: String) -> Self {
        Self(token)
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room code value object.
///
/// Four uppercase ASCII letters. Input is normalized to uppercase so players
/// can type codes in either case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomCode(String);

impl RoomCode {
    /// Create a new RoomCode, normalizing to uppercase.
    pub fn new(code: String) -> Result<Self, ValueObjectError> {
        let normalized = code.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(ValueObjectError::RoomCodeEmpty);
        }
        let valid = normalized.len() == ROOM_CODE_LEN
            && normalized.bytes().all(|b| ROOM_CODE_ALPHABET.contains(&b));
        if !valid {
            return Err(ValueObjectError::RoomCodeInvalidFormat {
                length: normalized.chars().count(),
            });
        }
        Ok(Self(normalized))
    }

    /// Wrap a code produced by the generator, which only draws valid letters.
    pub(super) fn from_generated(code: String) -> Self {
        Self(code)
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name value object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new DisplayName. Surrounding whitespace is trimmed.
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::DisplayNameEmpty);
        }
        let chars = trimmed.chars().count();
        if chars > DISPLAY_NAME_MAX_CHARS {
            return Err(ValueObjectError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX_CHARS,
                actual: chars,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one socket attachment.
///
/// A player keeps its session across reconnects, but every connection gets a
/// fresh id so a late close from an old socket cannot detach a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(uuid::Uuid);

impl ConnectionId {
    /// Allocate a new random connection id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp from Unix milliseconds.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Self(lobby_shared::time::now_millis())
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
