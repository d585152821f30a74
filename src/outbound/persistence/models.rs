//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use diesel::prelude::*;

use super::schema::{projects, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
}

/// Insertable struct for creating new account records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub created_at: &'a str,
}

/// Row struct for reading a full project record.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct ProjectRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub date: String,
    pub files: String,
    pub conversation: String,
    pub deployed: bool,
    pub deployment_name: Option<String>,
    pub version: i64,
}

/// Row struct for listing entries; skips the JSON blobs.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct ProjectSummaryRow {
    pub id: String,
    pub name: String,
    pub date: String,
    pub deployed: bool,
    pub deployment_name: Option<String>,
    pub version: i64,
}

/// Insertable struct for fresh project snapshots (always version 1).
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub(crate) struct NewProjectRow<'a> {
    pub id: &'a str,
    pub user_id: &'a str,
    pub name: &'a str,
    pub date: &'a str,
    pub files: &'a str,
    pub conversation: &'a str,
    pub deployed: bool,
    pub deployment_name: Option<&'a str>,
    pub version: i64,
}
