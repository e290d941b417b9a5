//! Join-code generation.

use quizarena_core::JoinCode;
use rand::Rng;

/// Characters that may appear in a join code.
///
/// Visually confusable characters (I, L, O, 0, 1) are excluded so a
/// code read off someone's screen types back in unambiguously.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// How many collision retries [`RoomRegistry::reserve_code`] makes
/// before giving up with `CodeExhausted`.
///
/// [`RoomRegistry::reserve_code`]: crate::RoomRegistry::reserve_code
pub const MAX_CODE_ATTEMPTS: usize = 10;

/// Draws one uniformly random join code.
pub fn generate_code() -> JoinCode {
    let mut rng = rand::rng();
    let code: String = (0..JoinCode::LEN)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect();
    JoinCode::from_normalized(code)
}
