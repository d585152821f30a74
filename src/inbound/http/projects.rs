//! Project API handlers.
//!
//! All routes require an authenticated session and operate strictly on the
//! caller's own projects. A project owned by someone else is indistinguishable
//! from a project that does not exist.

use actix_web::{delete, get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    ChatMessage, DeploymentName, Error, Project, ProjectDraft, ProjectFile, ProjectName,
    ProjectSummary,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    missing_field_error, parse_optional_rfc3339_timestamp, parse_project_id, FieldName,
};
use crate::inbound::http::ApiResult;

/// Request body for saving a project snapshot.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SaveProjectRequest {
    /// Omitted on first save; the server mints an id and starts at version 1.
    #[serde(default)]
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub files: Vec<ProjectFile>,
    #[serde(default)]
    pub conversation: Vec<ChatMessage>,
    /// RFC 3339; defaults to the server clock when absent.
    #[serde(default)]
    pub date: Option<String>,
}

/// Response for a successful save.
#[derive(Debug, Serialize, ToSchema)]
pub struct SaveProjectResponse {
    pub success: bool,
    pub id: String,
    pub version: i64,
}

/// Request body for deploying a project under a public name.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DeployRequest {
    pub project_id: Option<String>,
    pub deployment_name: Option<String>,
}

/// Response for a successful deploy.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeployResponse {
    pub success: bool,
    pub deployment_url: String,
}

/// Request body for taking a deployment offline.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UndeployRequest {
    pub project_id: Option<String>,
}

fn parse_draft(payload: &SaveProjectRequest) -> Result<ProjectDraft, Error> {
    let id = payload
        .id
        .as_deref()
        .map(|raw| parse_project_id(raw, FieldName::new("id")))
        .transpose()?;
    let name = payload
        .name
        .as_deref()
        .ok_or_else(|| missing_field_error(FieldName::new("name")))?;
    let name =
        ProjectName::new(name).map_err(|error| Error::invalid_request(error.to_string()))?;
    let last_modified =
        parse_optional_rfc3339_timestamp(payload.date.clone(), FieldName::new("date"))?;
    Ok(ProjectDraft {
        id,
        name,
        files: payload.files.clone(),
        conversation: payload.conversation.clone(),
        last_modified,
    })
}

/// Save a project snapshot, bumping its version.
#[utoipa::path(
    post,
    path = "/api/projects/save",
    request_body = SaveProjectRequest,
    responses(
        (status = 200, description = "Snapshot persisted", body = SaveProjectResponse),
        (status = 400, description = "Malformed request", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 404, description = "Project not found", body = Error)
    ),
    tags = ["projects"],
    operation_id = "saveProject"
)]
#[post("/projects/save")]
pub async fn save(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SaveProjectRequest>,
) -> ApiResult<web::Json<SaveProjectResponse>> {
    let profile = session.require()?;
    let draft = parse_draft(&payload)?;
    let receipt = state.projects.save(profile.id, draft).await?;
    Ok(web::Json(SaveProjectResponse {
        success: true,
        id: receipt.id.to_string(),
        version: receipt.version,
    }))
}

/// List the caller's projects, most recently modified first.
#[utoipa::path(
    get,
    path = "/api/projects",
    responses(
        (status = 200, description = "Project summaries", body = [ProjectSummary]),
        (status = 401, description = "Not authenticated", body = Error)
    ),
    tags = ["projects"],
    operation_id = "listProjects"
)]
#[get("/projects")]
pub async fn list(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ProjectSummary>>> {
    let profile = session.require()?;
    let summaries = state.projects.list(profile.id).await?;
    Ok(web::Json(summaries))
}

/// Fetch one of the caller's projects in full.
#[utoipa::path(
    get,
    path = "/api/projects/{project_id}",
    params(("project_id" = String, Path, description = "Project UUID")),
    responses(
        (status = 200, description = "Full project", body = Project),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 404, description = "Project not found", body = Error)
    ),
    tags = ["projects"],
    operation_id = "getProject"
)]
#[get("/projects/{project_id}")]
pub async fn fetch(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Project>> {
    let profile = session.require()?;
    let id = parse_project_id(&path, FieldName::new("project_id"))?;
    let project = state.projects.fetch(profile.id, id).await?;
    Ok(web::Json(project))
}

/// Delete one of the caller's projects.
#[utoipa::path(
    delete,
    path = "/api/projects/{project_id}",
    params(("project_id" = String, Path, description = "Project UUID")),
    responses(
        (status = 200, description = "Project removed"),
        (status = 401, description = "Not authenticated", body = Error)
    ),
    tags = ["projects"],
    operation_id = "deleteProject"
)]
#[delete("/projects/{project_id}")]
pub async fn remove(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let profile = session.require()?;
    let id = parse_project_id(&path, FieldName::new("project_id"))?;
    state.projects.delete(profile.id, id).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// Publish a project under a globally unique deployment name.
#[utoipa::path(
    post,
    path = "/api/projects/deploy",
    request_body = DeployRequest,
    responses(
        (status = 200, description = "Deployment live", body = DeployResponse),
        (status = 400, description = "Malformed request", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 404, description = "Project not found", body = Error),
        (status = 409, description = "Deployment name already taken", body = Error)
    ),
    tags = ["projects"],
    operation_id = "deployProject"
)]
#[post("/projects/deploy")]
pub async fn deploy(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<DeployRequest>,
) -> ApiResult<web::Json<DeployResponse>> {
    let profile = session.require()?;
    let raw_id = payload
        .project_id
        .as_deref()
        .ok_or_else(|| missing_field_error(FieldName::new("project_id")))?;
    let id = parse_project_id(raw_id, FieldName::new("project_id"))?;
    let raw_name = payload
        .deployment_name
        .as_deref()
        .ok_or_else(|| missing_field_error(FieldName::new("deployment_name")))?;
    let name = DeploymentName::new(raw_name)
        .map_err(|error| Error::invalid_request(error.to_string()))?;
    state.projects.deploy(profile.id, id, name.clone()).await?;
    Ok(web::Json(DeployResponse {
        success: true,
        deployment_url: format!("/p/{name}"),
    }))
}

/// Take one of the caller's deployments offline.
#[utoipa::path(
    post,
    path = "/api/projects/undeploy",
    request_body = UndeployRequest,
    responses(
        (status = 200, description = "Deployment offline"),
        (status = 400, description = "Malformed request", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 404, description = "Project not found", body = Error)
    ),
    tags = ["projects"],
    operation_id = "undeployProject"
)]
#[post("/projects/undeploy")]
pub async fn undeploy(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UndeployRequest>,
) -> ApiResult<HttpResponse> {
    let profile = session.require()?;
    let raw_id = payload
        .project_id
        .as_deref()
        .ok_or_else(|| missing_field_error(FieldName::new("project_id")))?;
    let id = parse_project_id(raw_id, FieldName::new("project_id"))?;
    state.projects.undeploy(profile.id, id).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
