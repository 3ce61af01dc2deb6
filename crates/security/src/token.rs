//! Gateway token generation.

/// Tokens shorter than this are considered weak.
pub const MIN_TOKEN_LEN: usize = 16;

/// Random bytes per generated token (64 hex characters).
pub const TOKEN_BYTES: usize = 32;

/// Generate a cryptographically strong, hex-encoded gateway token.
///
/// Uses `rand`'s thread-local CSPRNG.
pub fn generate_token() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    let mut bytes = [0u8; TOKEN_BYTES];
    rng.fill(&mut bytes[..]);
    hex::encode(bytes)
}

/// Whether `token` meets the minimum length.
pub fn is_strong(token: &str) -> bool {
    token.chars().count() >= MIN_TOKEN_LEN
}
