//! Project aggregate: generated files, the conversation that produced them,
//! a monotonic version counter, and the optional deployment binding.
//!
//! ## Invariants
//! - `version` starts at 1 and strictly increases across saves of one id.
//! - The deployment binding is `Option<DeploymentName>`: "deployment name is
//!   non-null iff deployed" holds by construction rather than by discipline.
//! - `files` and `conversation` keep their stored order; serde contracts
//!   match the persisted JSON blobs exactly (`type` key on files, lowercase
//!   role names) so snapshots round-trip byte-for-byte.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors for project types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    EmptyId,
    InvalidId,
    EmptyName,
    EmptyDeploymentName,
}

impl fmt::Display for ProjectValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "project id must not be empty"),
            Self::InvalidId => write!(f, "project id must be a valid UUID"),
            Self::EmptyName => write!(f, "project name must not be empty"),
            Self::EmptyDeploymentName => write!(f, "deployment name must not be empty"),
        }
    }
}

impl std::error::Error for ProjectValidationError {}

/// Stable project identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Validate and construct a [`ProjectId`] from textual input.
    pub fn parse(id: impl AsRef<str>) -> Result<Self, ProjectValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(ProjectValidationError::EmptyId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| ProjectValidationError::InvalidId)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-chosen project name. Non-empty once trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectName(String);

impl ProjectName {
    /// Validate and construct a project name.
    pub fn new(name: impl Into<String>) -> Result<Self, ProjectValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProjectValidationError::EmptyName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ProjectName {
    type Error = ProjectValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProjectName> for String {
    fn from(value: ProjectName) -> Self {
        value.0
    }
}

/// Human-chosen deployment name.
///
/// Comparison is exact-match and case-sensitive over the full string; no
/// normalisation or character-set policy is applied at this layer. The only
/// shape requirement is a non-empty value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct DeploymentName(String);

impl DeploymentName {
    /// Validate and construct a deployment name.
    pub fn new(name: impl Into<String>) -> Result<Self, ProjectValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProjectValidationError::EmptyDeploymentName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for DeploymentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeploymentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DeploymentName {
    type Error = ProjectValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeploymentName> for String {
    fn from(value: DeploymentName) -> Self {
        value.0
    }
}

/// Single generated file within a project snapshot.
///
/// The persisted JSON uses a `type` key; `kind` is renamed accordingly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProjectFile {
    pub filename: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
}

impl ProjectFile {
    /// Whether this entry is an HTML document, judged by filename suffix.
    pub fn is_html(&self) -> bool {
        self.filename.ends_with(".html")
    }
}

/// Role of a conversation participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message in the conversation that produced the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Full project record as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Project {
    pub id: ProjectId,
    pub owner_id: crate::domain::UserId,
    pub name: ProjectName,
    pub last_modified: DateTime<Utc>,
    pub files: Vec<ProjectFile>,
    pub conversation: Vec<ChatMessage>,
    pub version: i64,
    pub deployment: Option<DeploymentName>,
}

impl Project {
    /// First file in stored order whose filename ends with `.html`.
    pub fn main_html_file(&self) -> Option<&ProjectFile> {
        self.files.iter().find(|file| file.is_html())
    }
}

/// Listing entry exposed by the project index.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub name: ProjectName,
    pub last_modified: DateTime<Utc>,
    pub version: i64,
    pub deployment: Option<DeploymentName>,
}

/// Input to a save: either a fresh insert (no id) or an update.
///
/// `last_modified` is optional; the version manager fills in the current
/// time when the caller does not supply one.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub id: Option<ProjectId>,
    pub name: ProjectName,
    pub files: Vec<ProjectFile>,
    pub conversation: Vec<ChatMessage>,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Outcome of a save: the (possibly generated) id and the stored version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReceipt {
    pub id: ProjectId,
    pub version: i64,
}
