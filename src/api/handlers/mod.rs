//! API handlers and shared request validation.

pub mod health;
pub mod user_login;
pub mod user_register;

use axum::{http::StatusCode, Json};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const MISSING_FIELDS: &str = "email and password required";

/// Credentials submitted to both `/register` and `/login`.
///
/// `username` is accepted in place of `email`; the registry treats either as
/// an opaque identity.
#[derive(ToSchema, Deserialize, Debug)]
pub struct UserCredentials {
    #[serde(default, alias = "username")]
    email: String,
    #[serde(default)]
    #[schema(value_type = String, format = Password)]
    password: SecretString,
}

impl UserCredentials {
    /// Check the payload before it reaches the registry.
    ///
    /// # Errors
    /// Returns a `400` response body describing the first problem found.
    pub fn validate(&self) -> Result<(&str, &str), (StatusCode, Json<ErrorBody>)> {
        let password = self.password.expose_secret();

        if self.email.is_empty() || password.is_empty() {
            return Err(bad_request(MISSING_FIELDS));
        }

        if !valid_identity(&self.email) {
            return Err(bad_request("Invalid email"));
        }

        Ok((&self.email, password))
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    error: String,
}

impl ErrorBody {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

pub(crate) fn error_response(status: StatusCode, error: &str) -> (StatusCode, Json<ErrorBody>) {
    (status, Json(ErrorBody::new(error)))
}

pub(crate) fn bad_request(error: &str) -> (StatusCode, Json<ErrorBody>) {
    error_response(StatusCode::BAD_REQUEST, error)
}

pub(crate) fn missing_payload() -> (StatusCode, Json<ErrorBody>) {
    bad_request(MISSING_FIELDS)
}

/// Identities are either usernames or emails; both must be a single token
/// without whitespace.
pub fn valid_identity(identity: &str) -> bool {
    Regex::new(r"^\S+$").is_ok_and(|re| re.is_match(identity))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(json: &str) -> UserCredentials {
        match serde_json::from_str(json) {
            Ok(credentials) => credentials,
            Err(e) => panic!("invalid test payload {json}: {e}"),
        }
    }

    #[test]
    fn test_valid_identity() {
        assert!(valid_identity("alice"));
        assert!(valid_identity("alice@example.com"));
        assert!(!valid_identity(""));
        assert!(!valid_identity("alice smith"));
        assert!(!valid_identity(" alice"));
        assert!(!valid_identity("alice\n"));
    }

    #[test]
    fn test_username_alias() {
        let user = credentials(r#"{"username": "alice", "password": "secret"}"#);
        assert_eq!(user.validate().ok(), Some(("alice", "secret")));
    }

    #[test]
    fn test_missing_fields() {
        for json in [
            r#"{"email": "alice@example.com"}"#,
            r#"{"password": "secret"}"#,
            r#"{"email": "", "password": "secret"}"#,
            r#"{"email": "alice", "password": ""}"#,
            "{}",
        ] {
            let user = credentials(json);
            let Err((status, Json(body))) = user.validate() else {
                panic!("expected validation error for {json}");
            };
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body.error, MISSING_FIELDS);
        }
    }

    #[test]
    fn test_invalid_identity() {
        let user = credentials(r#"{"email": "alice smith", "password": "secret"}"#);
        let Err((status, Json(body))) = user.validate() else {
            panic!("expected validation error");
        };
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Invalid email");
    }

    #[test]
    fn test_debug_redacts_password() {
        let user = credentials(r#"{"email": "alice", "password": "hunter2"}"#);
        assert!(!format!("{user:?}").contains("hunter2"));
    }
}
