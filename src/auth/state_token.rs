//! Anti-forgery state token generation

use rand::{distributions::Alphanumeric, Rng};

/// Length of generated state tokens
pub const STATE_LENGTH: usize = 32;

/// Generates a random `[A-Za-z0-9]` token of `length` characters
pub fn generate_state(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
