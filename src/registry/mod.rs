//! In-memory credential registry.
//!
//! Maps an identity (username or email, matched exactly and case-sensitively)
//! to a credential record holding the SHA-256 digest of the secret and a
//! sequence id. Records live for the lifetime of the process.
//!
//! `register` takes the write lock across the existence check, id assignment
//! and insert, so two concurrent registrations for the same identity cannot
//! both succeed. `authenticate` only needs the read lock.

mod digest;
mod token;

pub use self::digest::SecretDigest;
pub use self::token::{Token, TOKEN_BYTES};

use serde::Serialize;
use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("User already exists")]
    AlreadyExists,
    /// Unknown identity and wrong secret both land here.
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Public view of a stored credential. Never carries the digest.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub id: u64,
    pub identity: String,
}

#[derive(Debug)]
struct CredentialRecord {
    id: u64,
    identity: String,
    secret_digest: SecretDigest,
}

impl CredentialRecord {
    fn public(&self) -> Credential {
        Credential {
            id: self.id,
            identity: self.identity.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<String, CredentialRecord>,
    /// Last id handed out; 0 until the first registration.
    last_id: u64,
}

#[derive(Debug, Default)]
pub struct Registry {
    inner: RwLock<Inner>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a credential for `identity`.
    ///
    /// # Errors
    /// Returns [`RegistryError::AlreadyExists`] if the identity is taken; the
    /// existing record and the id sequence are left untouched.
    #[instrument(skip(self, secret))]
    pub fn register(&self, identity: &str, secret: &str) -> Result<Credential, RegistryError> {
        // digest outside the lock, it does not depend on registry state
        let secret_digest = SecretDigest::of(secret);

        // every critical section leaves the map consistent, so a poisoned
        // lock is still safe to use
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        if inner.records.contains_key(identity) {
            debug!("identity already registered");
            return Err(RegistryError::AlreadyExists);
        }

        inner.last_id += 1;
        let record = CredentialRecord {
            id: inner.last_id,
            identity: identity.to_string(),
            secret_digest,
        };
        let credential = record.public();
        inner.records.insert(record.identity.clone(), record);

        debug!("registered credential id {}", credential.id);

        Ok(credential)
    }

    /// Check `secret` against the stored digest for `identity` and hand out a
    /// fresh token on success.
    ///
    /// # Errors
    /// Returns [`RegistryError::InvalidCredentials`] when the identity is
    /// unknown or the secret does not match.
    #[instrument(skip(self, secret))]
    pub fn authenticate(&self, identity: &str, secret: &str) -> Result<Token, RegistryError> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);

        let Some(record) = inner.records.get(identity) else {
            debug!("unknown identity");
            return Err(RegistryError::InvalidCredentials);
        };

        if !record.secret_digest.matches(secret) {
            debug!("secret mismatch");
            return Err(RegistryError::InvalidCredentials);
        }

        Ok(Token::generate())
    }

    /// Public view of the record for `identity`, if any.
    #[must_use]
    pub fn get(&self, identity: &str) -> Option<Credential> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .get(identity)
            .map(CredentialRecord::public)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
