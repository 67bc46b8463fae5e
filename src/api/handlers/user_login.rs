use super::{error_response, missing_payload, ErrorBody, UserCredentials};
use crate::registry::Registry;
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;

pub const TOKEN_TYPE: &str = "bearer";

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserLoggedIn {
    access_token: String,
    token_type: String,
}

#[utoipa::path(
    post,
    path= "/api/v1/auth/login",
    request_body = UserCredentials,
    responses (
        (status = 200, description = "Login successful", body = UserLoggedIn, content_type = "application/json"),
        (status = 400, description = "Missing or malformed email or password", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    tag= "auth"
)]
// axum handler for login
#[instrument(skip(registry, payload))]
pub async fn login(
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

    match registry.authenticate(email, password) {
        Ok(token) => {
            debug!("Login successful");

            (
                StatusCode::OK,
                Json(UserLoggedIn {
                    access_token: token.into_string(),
                    token_type: TOKEN_TYPE.to_string(),
                }),
            )
                .into_response()
        }

        Err(e) => {
            debug!("Unauthorized");

            error_response(StatusCode::UNAUTHORIZED, &e.to_string()).into_response()
        }
    }
}
