//! # Credstore
//!
//! `credstore` is a small user registration and login service. Identities
//! (usernames or emails) and their credentials are kept in an in-memory
//! [`registry::Registry`] for the lifetime of the process.
//!
//! ## Credentials
//!
//! Secrets are never stored in plaintext: each record keeps the SHA-256 digest
//! of the secret and a sequence id assigned at registration. A successful
//! login returns a fresh random bearer token which is not tracked afterwards.
//!
//! ## Errors
//!
//! Registration of an existing identity fails with `409 Conflict`. Login
//! failures return `401 Unauthorized` without revealing whether the identity
//! exists.

pub mod api;
pub mod cli;
pub mod registry;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
