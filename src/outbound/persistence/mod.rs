//! Persistence adapters backed by Diesel and SQLite.

mod diesel_account_service;
mod diesel_project_store;
mod models;
mod pool;
mod schema;

pub use diesel_account_service::DieselAccountService;
pub use diesel_project_store::DieselProjectStore;
pub use pool::{DbPool, PoolConfig, PoolError};
