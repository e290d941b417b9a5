//! Live-room registry for Quizarena.
//!
//! Maps short join codes to room ids and tracks which player is in
//! which live room. The registry is plain single-owner data — the
//! engine wraps it in a mutex, and that lock is what makes code
//! reservation and player binding atomic insert-if-absent operations.

mod code;
mod registry;

pub use code::{CODE_ALPHABET, MAX_CODE_ATTEMPTS, generate_code};
pub use registry::RoomRegistry;
