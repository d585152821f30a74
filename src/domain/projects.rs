//! Project use-cases: saving versions, managing deployment bindings, and
//! resolving published HTML.
//!
//! All ownership and uniqueness enforcement funnels through this service and
//! the store port behind it; handlers never reach the store directly.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::domain::ports::{ProjectStore, ProjectStoreError};
use crate::domain::{
    DeploymentName, Error, Project, ProjectDraft, ProjectId, ProjectSummary, SaveReceipt, UserId,
};

/// Map store plumbing failures to the domain taxonomy.
///
/// `NotFound` and `NameTaken` are expected outcomes with their own codes;
/// connection and query failures are internal.
fn map_store_error(error: ProjectStoreError) -> Error {
    match error {
        ProjectStoreError::NotFound => Error::not_found("project not found"),
        ProjectStoreError::NameTaken { name } => {
            Error::name_taken(format!("deployment name '{name}' is already taken"))
        }
        ProjectStoreError::Connection { message } | ProjectStoreError::Query { message } => {
            debug!(%message, "project store failure");
            Error::internal(message)
        }
    }
}

/// Domain façade over the project store.
#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn ProjectStore>,
}

impl ProjectService {
    /// Create a service backed by the given store.
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self { store }
    }

    /// Persist a snapshot, filling in `last_modified` when the caller left
    /// it out. Returns the stored id and the new version.
    pub async fn save(&self, owner: UserId, mut draft: ProjectDraft) -> Result<SaveReceipt, Error> {
        if draft.last_modified.is_none() {
            draft.last_modified = Some(Utc::now());
        }
        self.store
            .save(owner, draft)
            .await
            .map_err(map_store_error)
    }

    /// List the caller's projects, most recently modified first.
    pub async fn list(&self, owner: UserId) -> Result<Vec<ProjectSummary>, Error> {
        self.store
            .list_for_owner(owner)
            .await
            .map_err(map_store_error)
    }

    /// Fetch one project; foreign-owned and missing ids are the same error.
    pub async fn fetch(&self, owner: UserId, id: ProjectId) -> Result<Project, Error> {
        self.store
            .find_for_owner(owner, id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found("project not found"))
    }

    /// Delete one project. Succeeds whether or not a caller-owned row was
    /// removed; rows owned by others are untouched.
    pub async fn delete(&self, owner: UserId, id: ProjectId) -> Result<(), Error> {
        self.store
            .delete_for_owner(owner, id)
            .await
            .map_err(map_store_error)
    }

    /// Publish the project under a deployment name.
    pub async fn deploy(
        &self,
        owner: UserId,
        id: ProjectId,
        name: DeploymentName,
    ) -> Result<(), Error> {
        self.store
            .deploy(owner, id, name)
            .await
            .map_err(map_store_error)
    }

    /// Withdraw the project's deployment binding. Idempotent.
    pub async fn undeploy(&self, owner: UserId, id: ProjectId) -> Result<(), Error> {
        self.store
            .undeploy(owner, id)
            .await
            .map_err(map_store_error)
    }

    /// Resolve a deployment name to the HTML document to serve.
    ///
    /// Selects the first file (stored order) whose filename ends with
    /// `.html` and returns its content verbatim. The conversation is never
    /// consulted. This is the only unauthenticated read path.
    pub async fn render_deployment(&self, name: &DeploymentName) -> Result<String, Error> {
        let project = self
            .store
            .find_deployed(name)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("no deployment named '{name}'")))?;

        project
            .main_html_file()
            .map(|file| file.content.clone())
            .ok_or_else(|| Error::no_html_file("no HTML file found in deployment"))
    }
}
