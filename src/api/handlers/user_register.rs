use super::{error_response, missing_payload, ErrorBody, UserCredentials};
use crate::registry::{Registry, RegistryError};
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserRegistered {
    id: u64,
    email: String,
}

#[utoipa::path(
    post,
    path= "/api/v1/auth/register",
    request_body = UserCredentials,
    responses (
        (status = 201, description = "Registration successful", body = UserRegistered, content_type = "application/json"),
        (status = 400, description = "Missing or malformed email or password", body = ErrorBody),
        (status = 409, description = "User with the specified email already exists", body = ErrorBody),
    ),
    tag= "auth"
)]
// axum handler for register
#[instrument(skip(registry, payload))]
pub async fn register(
    registry: Extension<Arc<Registry>>,
    payload: Option<Json<UserCredentials>>,
) -> impl IntoResponse {
    let Some(Json(user)) = payload else {
        return missing_payload().into_response();
    };

    debug!("user: {:?}", user);

    let (email, password) = match user.validate() {
        Ok(fields) => fields,
        Err(response) => return response.into_response(),
    };

    match registry.register(email, password) {
        Ok(credential) => {
            info!("User created with id {}", credential.id);

            (
                StatusCode::CREATED,
                Json(UserRegistered {
                    id: credential.id,
                    email: credential.identity,
                }),
            )
                .into_response()
        }

        Err(e) => {
            let status = error_status(e);
            if status == StatusCode::CONFLICT {
                debug!("User already exists");
            } else {
                error!("Unexpected registry error on register: {e}");
            }

            error_response(status, &e.to_string()).into_response()
        }
    }
}

/// `InvalidCredentials` is not part of the register contract.
fn error_status(error: RegistryError) -> StatusCode {
    match error {
        RegistryError::AlreadyExists => StatusCode::CONFLICT,
        RegistryError::InvalidCredentials => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
