//! In-memory registry: the whole lobby lives in process memory and is lost on
//! restart.

mod lobby;

pub use lobby::InMemoryLobbyRepository;
