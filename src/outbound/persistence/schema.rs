//! Diesel table definitions for the SQLite schema.
//!
//! These definitions must match the embedded migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Registered accounts. `username` carries a unique constraint.
    users (id) {
        /// Primary key: UUID v4 as text.
        id -> Text,
        /// Unique login name.
        username -> Text,
        /// Hex-encoded SHA-256 digest of the password.
        password -> Text,
        /// Account creation timestamp, RFC 3339 text.
        created_at -> Text,
    }
}

diesel::table! {
    /// Project snapshots with version counter and deployment binding.
    ///
    /// A partial unique index over `deployment_name WHERE deployed = 1`
    /// backs the global deployment namespace.
    projects (id) {
        /// Primary key: UUID v4 as text.
        id -> Text,
        /// Owning account id.
        user_id -> Text,
        /// Human-chosen project name.
        name -> Text,
        /// Last-modified timestamp, RFC 3339 text; drives list ordering.
        date -> Text,
        /// JSON array of `{filename, type, content}` entries.
        files -> Text,
        /// JSON array of `{role, content}` messages.
        conversation -> Text,
        /// Whether the project is currently published.
        deployed -> Bool,
        /// Deployment name; set together with `deployed`.
        deployment_name -> Nullable<Text>,
        /// Monotonic version counter, starts at 1.
        version -> BigInt,
    }
}

diesel::joinable!(projects -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(users, projects);
