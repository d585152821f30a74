//! SQLite-backed `AccountService` adapter.
//!
//! Credential storage mirrors the upstream contract: usernames are unique at
//! the schema level (signup races resolve via the constraint, not a prior
//! read), and passwords are stored as hex-encoded SHA-256 digests. Identity
//! is a thin collaborator here; this adapter is deliberately minimal.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::SqliteConnection;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::ports::{AccountService, AccountServiceError};
use crate::domain::{AccountProfile, Credentials, UserId};

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the account service port.
#[derive(Clone)]
pub struct DieselAccountService {
    pool: DbPool,
}

impl DieselAccountService {
    /// Create a new service with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn run<T, F>(&self, op: F) -> Result<T, AccountServiceError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, AccountServiceError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(map_pool_error)?;
            op(&mut conn)
        })
        .await
        .map_err(|error| AccountServiceError::query(format!("blocking task failed: {error}")))?
    }
}

fn map_pool_error(error: PoolError) -> AccountServiceError {
    let (PoolError::Checkout { message } | PoolError::Build { message }) = error;
    AccountServiceError::connection(message)
}

fn map_diesel_error(error: DieselError) -> AccountServiceError {
    debug!(error = %error, "account store operation failed");
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            AccountServiceError::connection("database connection error")
        }
        other => AccountServiceError::query(other.to_string()),
    }
}

fn digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

#[async_trait]
impl AccountService for DieselAccountService {
    async fn sign_up(
        &self,
        credentials: &Credentials,
    ) -> Result<AccountProfile, AccountServiceError> {
        let username = credentials.username().to_owned();
        let password_digest = digest(credentials.password());

        self.run(move |conn| {
            let id = UserId::random();
            let result = diesel::insert_into(users::table)
                .values(NewUserRow {
                    id: &id.to_string(),
                    username: &username,
                    password: &password_digest,
                    created_at: &Utc::now().to_rfc3339(),
                })
                .execute(conn);

            match result {
                Ok(_) => Ok(AccountProfile { id, username }),
                Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                    Err(AccountServiceError::username_taken(username))
                }
                Err(error) => Err(map_diesel_error(error)),
            }
        })
        .await
    }

    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<AccountProfile, AccountServiceError> {
        let username = credentials.username().to_owned();
        let password_digest = digest(credentials.password());

        self.run(move |conn| {
            let row = users::table
                .filter(users::username.eq(&username))
                .select(UserRow::as_select())
                .first::<UserRow>(conn)
                .optional()
                .map_err(map_diesel_error)?;

            let Some(row) = row else {
                return Err(AccountServiceError::InvalidCredentials);
            };
            if row.password != password_digest {
                return Err(AccountServiceError::InvalidCredentials);
            }

            let id = UserId::parse(&row.id)
                .map_err(|error| AccountServiceError::query(error.to_string()))?;
            Ok(AccountProfile {
                id,
                username: row.username,
            })
        })
        .await
    }
}
