// src/utils/code.rs

use rand::Rng;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const CODE_LENGTH: usize = 6;

/// Produces a 6-character uppercase alphanumeric join code from a uniform
/// random source. Collisions are possible and handled by the caller
/// through regeneration, never surfaced as an error.
pub fn generate_join_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}
