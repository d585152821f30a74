//! Driven port for durable project state.
//!
//! The store owns the atomicity guarantees: the version increment and the
//! deployment-name claim are single conditional writes, serialised per
//! project id and per name respectively. Every mutating operation is scoped
//! to the owning user; a row owned by someone else matches zero rows and
//! surfaces as [`ProjectStoreError::NotFound`].

use async_trait::async_trait;

use crate::domain::{
    DeploymentName, Project, ProjectDraft, ProjectId, ProjectSummary, SaveReceipt, UserId,
};

/// Errors raised by project store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectStoreError {
    /// Store connection could not be established.
    #[error("project store connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("project store query failed: {message}")]
    Query { message: String },

    /// No project with the given id is owned by the caller.
    #[error("project not found for this owner")]
    NotFound,

    /// The deployment name is already held by a different deployed project.
    #[error("deployment name '{name}' is already taken")]
    NameTaken { name: String },
}

impl ProjectStoreError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a name-taken error for the given name.
    pub fn name_taken(name: impl Into<String>) -> Self {
        Self::NameTaken { name: name.into() }
    }
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Persist a snapshot.
    ///
    /// Without an id: insert at version 1 under a fresh id. With an id that
    /// the caller owns: replace name/files/conversation and increment the
    /// version, atomically. With an unknown id: insert at version 1 under
    /// the supplied id (idempotent create). With an id owned by somebody
    /// else: [`ProjectStoreError::NotFound`].
    async fn save(&self, owner: UserId, draft: ProjectDraft)
        -> Result<SaveReceipt, ProjectStoreError>;

    /// List the caller's projects, most recently modified first.
    async fn list_for_owner(&self, owner: UserId)
        -> Result<Vec<ProjectSummary>, ProjectStoreError>;

    /// Fetch one project by id, scoped to the caller.
    async fn find_for_owner(
        &self,
        owner: UserId,
        id: ProjectId,
    ) -> Result<Option<Project>, ProjectStoreError>;

    /// Delete one project by id, scoped to the caller. Succeeds whether or
    /// not a caller-owned row existed; rows owned by others are untouched.
    async fn delete_for_owner(&self, owner: UserId, id: ProjectId)
        -> Result<(), ProjectStoreError>;

    /// Bind the project to a deployment name and mark it deployed.
    ///
    /// Fails with [`ProjectStoreError::NameTaken`] when a *different*
    /// deployed project holds the name; re-deploying the same project under
    /// the same or a new name simply overwrites its own binding.
    async fn deploy(
        &self,
        owner: UserId,
        id: ProjectId,
        name: DeploymentName,
    ) -> Result<(), ProjectStoreError>;

    /// Clear the deployment binding. Idempotent.
    async fn undeploy(&self, owner: UserId, id: ProjectId) -> Result<(), ProjectStoreError>;

    /// Resolve a deployment name to its published project. Public read path;
    /// deliberately unscoped.
    async fn find_deployed(
        &self,
        name: &DeploymentName,
    ) -> Result<Option<Project>, ProjectStoreError>;
}
