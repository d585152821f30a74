//! SQLite-backed `ProjectStore` implementation using Diesel.
//!
//! The two racy sequences in this subsystem are collapsed into single
//! conditional writes here:
//!
//! - the version increment is `SET version = version + 1 ... RETURNING
//!   version`, scoped to `(id, user_id)`, inside an immediate transaction
//!   that also covers insert-vs-update resolution;
//! - the deployment-name claim relies on the partial unique index over
//!   `deployment_name WHERE deployed = 1`, translating the unique violation
//!   to [`ProjectStoreError::NameTaken`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::SqliteConnection;
use tracing::debug;

use crate::domain::ports::{ProjectStore, ProjectStoreError};
use crate::domain::{
    ChatMessage, DeploymentName, Project, ProjectDraft, ProjectFile, ProjectId, ProjectName,
    ProjectSummary, SaveReceipt, UserId,
};

use super::models::{NewProjectRow, ProjectRow, ProjectSummaryRow};
use super::pool::{DbPool, PoolError};
use super::schema::projects;

/// Diesel-backed implementation of the project store port.
#[derive(Clone)]
pub struct DieselProjectStore {
    pool: DbPool,
}

impl DieselProjectStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run a synchronous Diesel operation on the blocking pool.
    async fn run<T, F>(&self, op: F) -> Result<T, ProjectStoreError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, ProjectStoreError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(map_pool_error)?;
            op(&mut conn)
        })
        .await
        .map_err(|error| ProjectStoreError::query(format!("blocking task failed: {error}")))?
    }
}

fn map_pool_error(error: PoolError) -> ProjectStoreError {
    let (PoolError::Checkout { message } | PoolError::Build { message }) = error;
    ProjectStoreError::connection(message)
}

fn map_diesel_error(error: DieselError) -> ProjectStoreError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ProjectStoreError::connection("database connection error")
        }
        other => ProjectStoreError::query(other.to_string()),
    }
}

/// Closure error for transactions that mix Diesel failures with store
/// outcomes decided mid-transaction (ownership misses, in particular).
enum TxError {
    Db(DieselError),
    Store(ProjectStoreError),
}

impl From<DieselError> for TxError {
    fn from(error: DieselError) -> Self {
        Self::Db(error)
    }
}

impl From<ProjectStoreError> for TxError {
    fn from(error: ProjectStoreError) -> Self {
        Self::Store(error)
    }
}

impl TxError {
    fn into_store_error(self) -> ProjectStoreError {
        match self {
            Self::Db(error) => map_diesel_error(error),
            Self::Store(error) => error,
        }
    }
}

fn encode_json<T: serde::Serialize>(value: &T, field: &str) -> Result<String, ProjectStoreError> {
    serde_json::to_string(value)
        .map_err(|error| ProjectStoreError::query(format!("serialise {field}: {error}")))
}

fn decode_json<T: serde::de::DeserializeOwned>(
    raw: &str,
    field: &str,
) -> Result<T, ProjectStoreError> {
    serde_json::from_str(raw)
        .map_err(|error| ProjectStoreError::query(format!("decode {field}: {error}")))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ProjectStoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|stamp| stamp.with_timezone(&Utc))
        .map_err(|error| ProjectStoreError::query(format!("decode timestamp: {error}")))
}

/// Reconstruct the deployment binding, insisting on the stored invariant
/// that a deployed row carries a name.
fn parse_deployment(
    deployed: bool,
    deployment_name: Option<String>,
) -> Result<Option<DeploymentName>, ProjectStoreError> {
    if !deployed {
        return Ok(None);
    }
    let name = deployment_name
        .ok_or_else(|| ProjectStoreError::query("deployed project without deployment name"))?;
    DeploymentName::new(name)
        .map(Some)
        .map_err(|error| ProjectStoreError::query(error.to_string()))
}

fn row_to_project(row: ProjectRow) -> Result<Project, ProjectStoreError> {
    let ProjectRow {
        id,
        user_id,
        name,
        date,
        files,
        conversation,
        deployed,
        deployment_name,
        version,
    } = row;

    let files: Vec<ProjectFile> = decode_json(&files, "files")?;
    let conversation: Vec<ChatMessage> = decode_json(&conversation, "conversation")?;

    Ok(Project {
        id: ProjectId::parse(&id).map_err(|error| ProjectStoreError::query(error.to_string()))?,
        owner_id: UserId::parse(&user_id)
            .map_err(|error| ProjectStoreError::query(error.to_string()))?,
        name: ProjectName::new(name).map_err(|error| ProjectStoreError::query(error.to_string()))?,
        last_modified: parse_timestamp(&date)?,
        files,
        conversation,
        version,
        deployment: parse_deployment(deployed, deployment_name)?,
    })
}

fn row_to_summary(row: ProjectSummaryRow) -> Result<ProjectSummary, ProjectStoreError> {
    let ProjectSummaryRow {
        id,
        name,
        date,
        deployed,
        deployment_name,
        version,
    } = row;

    Ok(ProjectSummary {
        id: ProjectId::parse(&id).map_err(|error| ProjectStoreError::query(error.to_string()))?,
        name: ProjectName::new(name).map_err(|error| ProjectStoreError::query(error.to_string()))?,
        last_modified: parse_timestamp(&date)?,
        version,
        deployment: parse_deployment(deployed, deployment_name)?,
    })
}

fn insert_fresh(
    conn: &mut SqliteConnection,
    owner: &str,
    id: &str,
    name: &str,
    date: &str,
    files: &str,
    conversation: &str,
) -> Result<(), DieselError> {
    diesel::insert_into(projects::table)
        .values(NewProjectRow {
            id,
            user_id: owner,
            name,
            date,
            files,
            conversation,
            deployed: false,
            deployment_name: None,
            version: 1,
        })
        .execute(conn)
        .map(|_| ())
}

/// Insert-or-version-bump, decided inside one immediate (write) transaction
/// so a concurrent save of the same id cannot slip between the existence
/// check and the write.
fn save_snapshot(
    conn: &mut SqliteConnection,
    owner: UserId,
    draft: ProjectDraft,
) -> Result<SaveReceipt, ProjectStoreError> {
    let files_json = encode_json(&draft.files, "files")?;
    let conversation_json = encode_json(&draft.conversation, "conversation")?;
    let date = draft.last_modified.unwrap_or_else(Utc::now).to_rfc3339();
    let owner_id = owner.to_string();
    let name = draft.name;

    conn.immediate_transaction::<_, TxError, _>(|conn| {
        let id = match draft.id {
            Some(id) => id,
            None => {
                let id = ProjectId::random();
                insert_fresh(
                    conn,
                    &owner_id,
                    &id.to_string(),
                    name.as_ref(),
                    &date,
                    &files_json,
                    &conversation_json,
                )?;
                return Ok(SaveReceipt { id, version: 1 });
            }
        };

        let updated = diesel::update(
            projects::table.filter(
                projects::id
                    .eq(id.to_string())
                    .and(projects::user_id.eq(&owner_id)),
            ),
        )
        .set((
            projects::name.eq(name.as_ref()),
            projects::date.eq(&date),
            projects::files.eq(&files_json),
            projects::conversation.eq(&conversation_json),
            projects::version.eq(projects::version + 1),
        ))
        .returning(projects::version)
        .get_result::<i64>(conn)
        .optional()?;

        if let Some(version) = updated {
            return Ok(SaveReceipt { id, version });
        }

        // Zero rows matched: either the id is free (idempotent create with
        // the supplied id) or it belongs to another owner.
        let held_by_other: i64 = projects::table
            .filter(projects::id.eq(id.to_string()))
            .count()
            .get_result(conn)?;
        if held_by_other > 0 {
            return Err(ProjectStoreError::NotFound.into());
        }

        insert_fresh(
            conn,
            &owner_id,
            &id.to_string(),
            name.as_ref(),
            &date,
            &files_json,
            &conversation_json,
        )?;
        Ok(SaveReceipt { id, version: 1 })
    })
    .map_err(TxError::into_store_error)
}

#[async_trait]
impl ProjectStore for DieselProjectStore {
    async fn save(
        &self,
        owner: UserId,
        draft: ProjectDraft,
    ) -> Result<SaveReceipt, ProjectStoreError> {
        self.run(move |conn| save_snapshot(conn, owner, draft)).await
    }

    async fn list_for_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<ProjectSummary>, ProjectStoreError> {
        self.run(move |conn| {
            let rows: Vec<ProjectSummaryRow> = projects::table
                .filter(projects::user_id.eq(owner.to_string()))
                .order(projects::date.desc())
                .select((
                    projects::id,
                    projects::name,
                    projects::date,
                    projects::deployed,
                    projects::deployment_name,
                    projects::version,
                ))
                .load(conn)
                .map_err(map_diesel_error)?;

            rows.into_iter().map(row_to_summary).collect()
        })
        .await
    }

    async fn find_for_owner(
        &self,
        owner: UserId,
        id: ProjectId,
    ) -> Result<Option<Project>, ProjectStoreError> {
        self.run(move |conn| {
            let row = projects::table
                .filter(
                    projects::id
                        .eq(id.to_string())
                        .and(projects::user_id.eq(owner.to_string())),
                )
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(conn)
                .optional()
                .map_err(map_diesel_error)?;

            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn delete_for_owner(
        &self,
        owner: UserId,
        id: ProjectId,
    ) -> Result<(), ProjectStoreError> {
        self.run(move |conn| {
            // Deleting nothing is a success: either the project never
            // existed or it belongs to someone else, and neither case leaks.
            diesel::delete(
                projects::table.filter(
                    projects::id
                        .eq(id.to_string())
                        .and(projects::user_id.eq(owner.to_string())),
                ),
            )
            .execute(conn)
            .map(|_| ())
            .map_err(map_diesel_error)
        })
        .await
    }

    async fn deploy(
        &self,
        owner: UserId,
        id: ProjectId,
        name: DeploymentName,
    ) -> Result<(), ProjectStoreError> {
        self.run(move |conn| {
            let result = diesel::update(
                projects::table.filter(
                    projects::id
                        .eq(id.to_string())
                        .and(projects::user_id.eq(owner.to_string())),
                ),
            )
            .set((
                projects::deployed.eq(true),
                projects::deployment_name.eq(name.as_ref()),
            ))
            .execute(conn);

            match result {
                Ok(0) => Err(ProjectStoreError::NotFound),
                Ok(_) => Ok(()),
                Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                    Err(ProjectStoreError::name_taken(name.as_ref()))
                }
                Err(error) => Err(map_diesel_error(error)),
            }
        })
        .await
    }

    async fn undeploy(&self, owner: UserId, id: ProjectId) -> Result<(), ProjectStoreError> {
        self.run(move |conn| {
            let rows = diesel::update(
                projects::table.filter(
                    projects::id
                        .eq(id.to_string())
                        .and(projects::user_id.eq(owner.to_string())),
                ),
            )
            .set((
                projects::deployed.eq(false),
                projects::deployment_name.eq(Option::<String>::None),
            ))
            .execute(conn)
            .map_err(map_diesel_error)?;

            // Idempotent for owned rows; only a missing or foreign-owned id
            // is an error.
            if rows == 0 {
                Err(ProjectStoreError::NotFound)
            } else {
                Ok(())
            }
        })
        .await
    }

    async fn find_deployed(
        &self,
        name: &DeploymentName,
    ) -> Result<Option<Project>, ProjectStoreError> {
        let name = name.clone();
        self.run(move |conn| {
            let row = projects::table
                .filter(
                    projects::deployment_name
                        .eq(name.as_ref())
                        .and(projects::deployed.eq(true)),
                )
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(conn)
                .optional()
                .map_err(map_diesel_error)?;

            row.map(row_to_project).transpose()
        })
        .await
    }
}
