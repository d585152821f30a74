//! OpenAPI documentation configuration.
//!
//! Registers every HTTP endpoint plus the schemas they reference, and the
//! session cookie security scheme. Authenticated routes declare the scheme;
//! the auth endpoints and the public deployment view opt out with
//! `security([])`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{ChatMessage, ChatRole, Error, ErrorCode, Project, ProjectFile, ProjectSummary};
use crate::inbound::http::accounts::{AuthResponse, CheckResponse, CredentialsRequest};
use crate::inbound::http::generate::GenerateRequest;
use crate::inbound::http::projects::{
    DeployRequest, DeployResponse, SaveProjectRequest, SaveProjectResponse, UndeployRequest,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/signup or /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Boltning API",
        description = "Project versioning, deployment publishing, and generation proxying."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::signup,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::check,
        crate::inbound::http::projects::save,
        crate::inbound::http::projects::list,
        crate::inbound::http::projects::fetch,
        crate::inbound::http::projects::remove,
        crate::inbound::http::projects::deploy,
        crate::inbound::http::projects::undeploy,
        crate::inbound::http::generate::generate,
        crate::inbound::http::publish::view,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Project,
        ProjectSummary,
        ProjectFile,
        ChatMessage,
        ChatRole,
        CredentialsRequest,
        AuthResponse,
        CheckResponse,
        SaveProjectRequest,
        SaveProjectResponse,
        DeployRequest,
        DeployResponse,
        UndeployRequest,
        GenerateRequest,
    )),
    tags(
        (name = "auth", description = "Account creation and session management"),
        (name = "projects", description = "Versioned project snapshots and deployments"),
        (name = "generation", description = "Upstream text-generation proxy"),
        (name = "public", description = "Unauthenticated deployment views")
    )
)]
pub struct ApiDoc;
