//! Driving port for account signup and authentication.
//!
//! In hexagonal terms this is a *driving* port: the HTTP adapter calls it to
//! establish an identity without knowing the backing credential store, which
//! keeps handler tests deterministic via test doubles.

use async_trait::async_trait;

use crate::domain::{AccountProfile, Credentials};

/// Errors raised by account service adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountServiceError {
    /// Credential store connection could not be established.
    #[error("account store connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("account store query failed: {message}")]
    Query { message: String },

    /// Another account already holds the requested username.
    #[error("username '{username}' already exists")]
    UsernameTaken { username: String },

    /// Unknown username or digest mismatch; deliberately indistinct.
    #[error("invalid username or password")]
    InvalidCredentials,
}

impl AccountServiceError {
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

    /// Create a username-taken error for the given username.
    pub fn username_taken(username: impl Into<String>) -> Self {
        Self::UsernameTaken {
            username: username.into(),
        }
    }
}

#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create an account and return its identity.
    async fn sign_up(&self, credentials: &Credentials)
        -> Result<AccountProfile, AccountServiceError>;

    /// Verify credentials and return the matching identity.
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<AccountProfile, AccountServiceError>;
}
