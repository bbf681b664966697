//! Room code minting.

use super::types::{ROOM_CODE_ALPHABET, ROOM_CODE_LENGTH};
use rand::RngExt;

/// Generate a fresh 4-character uppercase alphanumeric room code.
///
/// Callers are responsible for retrying against the registry on
/// collision; this function alone never checks uniqueness.
pub fn generate_room_code() -> String {
    let mut rng = rand::rng();
    (0..ROOM_CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..ROOM_CODE_ALPHABET.len());
            // SAFETY: `idx` is produced by `random_range(0..len)`, so it is
            // always within [0, len).
            #[allow(clippy::indexing_slicing)]
            let ch = ROOM_CODE_ALPHABET[idx] as char;
            ch
        })
        .collect()
}
