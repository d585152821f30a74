//! Shared fixtures for integration tests: a throwaway SQLite database and
//! real persistence adapters on top of it.
#![allow(dead_code)]

use boltning::domain::ports::AccountService;
use boltning::domain::{Credentials, UserId};
use boltning::outbound::persistence::{DbPool, DieselAccountService, PoolConfig};
use tempfile::TempDir;

/// A pool over a fresh database file in a temporary directory.
///
/// The [`TempDir`] must stay alive for as long as the pool is used.
pub fn test_pool() -> (TempDir, DbPool) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("test.db");
    let pool = DbPool::new(PoolConfig::new(path.to_string_lossy()).with_max_size(4))
        .expect("build pool");
    (dir, pool)
}

/// Create an account through the real adapter and return its id.
///
/// Foreign keys are enforced, so project rows need a real owner row.
pub async fn create_user(pool: &DbPool, username: &str) -> UserId {
    let accounts = DieselAccountService::new(pool.clone());
    let credentials = Credentials::try_from_parts(username, "secret").expect("valid credentials");
    let profile = accounts.sign_up(&credentials).await.expect("sign up");
    profile.id
}
