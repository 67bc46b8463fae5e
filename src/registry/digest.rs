use sha2::{Digest, Sha256};
use std::fmt;

/// One-way digest of a plaintext secret.
///
/// The plaintext never leaves [`SecretDigest::of`]; records only keep the
/// SHA-256 output, rendered as lowercase hex.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretDigest(String);

impl SecretDigest {
    #[must_use]
    pub fn of(secret: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Compare against a freshly supplied plaintext.
    #[must_use]
    pub fn matches(&self, secret: &str) -> bool {
        let candidate = Self::of(secret);

        // fold over every byte so the comparison time does not depend on
        // where the first mismatch sits
        self.0.len() == candidate.0.len()
            && self
                .0
                .bytes()
                .zip(candidate.0.bytes())
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }

    #[must_use]
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecretDigest").field(&"***").finish()
    }
}
