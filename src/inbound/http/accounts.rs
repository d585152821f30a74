//! Account API handlers.
//!
//! ```text
//! POST /api/auth/signup {"username":"ada","password":"secret"}
//! POST /api/auth/login  {"username":"ada","password":"secret"}
//! POST /api/auth/logout
//! GET  /api/auth/check
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::AccountServiceError;
use crate::domain::{Credentials, Error, UserValidationError};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request body shared by signup and login.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Response returned on successful signup or login.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub user_id: String,
    pub username: String,
}

/// Response for the session check endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

fn map_credentials_error(err: UserValidationError) -> Error {
    match err {
        UserValidationError::EmptyUsername => Error::invalid_request("username is required")
            .with_details(json!({ "field": "username", "code": "missing_field" })),
        UserValidationError::EmptyPassword => Error::invalid_request("password is required")
            .with_details(json!({ "field": "password", "code": "missing_field" })),
        other => Error::invalid_request(other.to_string()),
    }
}

fn map_account_error(err: AccountServiceError) -> Error {
    match err {
        AccountServiceError::UsernameTaken { username } => {
            Error::invalid_request(format!("username '{username}' already exists"))
                .with_details(json!({ "field": "username", "code": "username_taken" }))
        }
        AccountServiceError::InvalidCredentials => {
            Error::unauthorized("invalid username or password")
        }
        AccountServiceError::Connection { message } | AccountServiceError::Query { message } => {
            Error::internal(message)
        }
    }
}

/// Create an account and establish a session.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Account created and session established", body = AuthResponse),
        (status = 400, description = "Missing fields or username taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let credentials = Credentials::try_from_parts(&payload.username, &payload.password)
        .map_err(map_credentials_error)?;
    let profile = state
        .accounts
        .sign_up(&credentials)
        .await
        .map_err(map_account_error)?;
    session.persist(&profile)?;
    Ok(web::Json(AuthResponse {
        success: true,
        user_id: profile.id.to_string(),
        username: profile.username,
    }))
}

/// Verify credentials and establish a session.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Session established", body = AuthResponse),
        (status = 400, description = "Missing fields", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let credentials = Credentials::try_from_parts(&payload.username, &payload.password)
        .map_err(map_credentials_error)?;
    let profile = state
        .accounts
        .authenticate(&credentials)
        .await
        .map_err(map_account_error)?;
    session.persist(&profile)?;
    Ok(web::Json(AuthResponse {
        success: true,
        user_id: profile.id.to_string(),
        username: profile.username,
    }))
}

/// Drop the current session.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().json(json!({ "success": true }))
}

/// Report whether the caller currently holds a session.
#[utoipa::path(
    get,
    path = "/api/auth/check",
    responses((status = 200, description = "Session status", body = CheckResponse)),
    tags = ["auth"],
    operation_id = "checkAuth",
    security([])
)]
#[get("/auth/check")]
pub async fn check(session: SessionContext) -> ApiResult<web::Json<CheckResponse>> {
    let response = match session.current()? {
        Some(profile) => CheckResponse {
            authenticated: true,
            user_id: Some(profile.id.to_string()),
            username: Some(profile.username),
        },
        None => CheckResponse {
            authenticated: false,
            user_id: None,
            username: None,
        },
    };
    Ok(web::Json(response))
}
