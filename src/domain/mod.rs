//! Domain primitives, aggregates, and ports.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! layers. Keep types immutable and document invariants and serialisation
//! contracts (serde) in each type's Rustdoc.

pub mod error;
pub mod generation;
pub mod ports;
pub mod project;
pub mod projects;
pub mod user;

pub use self::error::{Error, ErrorCode};
pub use self::project::{
    ChatMessage, ChatRole, DeploymentName, Project, ProjectDraft, ProjectFile, ProjectId,
    ProjectName, ProjectSummary, ProjectValidationError, SaveReceipt,
};
pub use self::projects::ProjectService;
pub use self::user::{AccountProfile, Credentials, UserId, UserValidationError};
