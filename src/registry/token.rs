use rand::{rngs::OsRng, RngCore};
use std::fmt;

/// Number of random bytes behind every token.
pub const TOKEN_BYTES: usize = 16;

/// Opaque proof-of-authentication handed back by a successful login.
///
/// Tokens are not stored anywhere; the registry forgets them as soon as they
/// are returned.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Draw a fresh token from the OS random source.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&"***").finish()
    }
}
