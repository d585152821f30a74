//! Project versioning and deployment publishing service.
//!
//! Accounts own versioned project snapshots; a snapshot can be published
//! under a globally unique deployment name and served to anyone as HTML. A
//! thin proxy forwards generation requests to an external text endpoint.
//!
//! The crate follows a hexagonal layout: `domain` holds the entities, rules,
//! and ports; `inbound` adapts HTTP onto the domain; `outbound` implements
//! the ports against SQLite and the upstream generation endpoint; `server`
//! wires it all together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use middleware::Trace;
