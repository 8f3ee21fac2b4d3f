//! Domain factories for generating identifiers.
//!
//! Room codes and session tokens come from one generator that is seeded once
//! at startup and shared by the registry. Uniqueness against live entries is
//! the caller's job; see [`unique_room_code`] and [`unique_session_token`].

use std::sync::{Mutex, PoisonError};

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::value_object::{ROOM_CODE_ALPHABET, ROOM_CODE_LEN, RoomCode, SessionToken};

/// Source of fresh identifiers
pub trait IdGenerator: Send + Sync {
    /// Draw a room code of four uniform, independent letters
    fn room_code(&self) -> RoomCode;

    /// Draw an unguessable session token
    fn session_token(&self) -> SessionToken;
}

/// Generator backed by a cryptographically secure RNG.
pub struct RandomIdGenerator {
    rng: Mutex<StdRng>,
}

impl RandomIdGenerator {
    /// Seed from operating system entropy.
    pub fn from_os_rng() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic generator for tests and reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl IdGenerator for RandomIdGenerator {
    fn room_code(&self) -> RoomCode {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let code: String = (0..ROOM_CODE_LEN)
            .map(|_| char::from(ROOM_CODE_ALPHABET[rng.random_range(0..ROOM_CODE_ALPHABET.len())]))
            .collect();
        RoomCode::from_generated(code)
    }

    fn session_token(&self) -> SessionToken {
        let mut bytes = [0u8; 16];
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .fill(&mut bytes);
        let uuid = uuid::Builder::from_random_bytes(bytes).into_uuid();
        SessionToken::from_generated(uuid.simple().to_string())
    }
}

/// Draw room codes until one is not taken.
pub fn unique_room_code(
    generator: &dyn IdGenerator,
    is_taken: impl Fn(&RoomCode) -> bool,
) -> RoomCode {
    loop {
        let code = generator.room_code();
        if !is_taken(&code) {
            return code;
        }
        tracing::debug!(code = %code, "Room code collision, re-rolling");
    }
}

/// Draw session tokens until one is not taken.
pub fn unique_session_token(
    generator: &dyn IdGenerator,
    is_taken: impl Fn(&SessionToken) -> bool,
) -> SessionToken {
    loop {
        let token = generator.session_token();
        if !is_taken(&token) {
            return token;
        }
        tracing::warn!("Session token collision, re-rolling");
    }
}

/// Generator that replays fixed sequences, for collision tests.
#[cfg(test)]
pub(crate) struct ScriptedGenerator {
    codes: Mutex<std::collections::VecDeque<&'static str>>,
    tokens: Mutex<std::collections::VecDeque<&'static str>>,
    fallback: RandomIdGenerator,
}

#[cfg(test)]
impl ScriptedGenerator {
    pub(crate) fn new(codes: &[&'static str], tokens: &[&'static str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().copied().collect()),
            tokens: Mutex::new(tokens.iter().copied().collect()),
            fallback: RandomIdGenerator::seeded(7),
        }
    }
}

#[cfg(test)]
impl IdGenerator for ScriptedGenerator {
    fn room_code(&self) -> RoomCode {
        match self.codes.lock().unwrap().pop_front() {
            Some(code) => RoomCode::from_generated(code.to_string()),
            None => self.fallback.room_code(),
        }
    }

    fn session_token(&self) -> SessionToken {
        match self.tokens.lock().unwrap().pop_front() {
            Some(token) => SessionToken::from_generated(token.to_string()),
            None => self.fallback.session_token(),
        }
    }
}
