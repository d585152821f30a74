//! HTTP adapter: Actix handlers, session plumbing, and error mapping.
//!
//! Handlers depend only on [`state::HttpState`] and the domain ports, so the
//! whole surface is testable against in-memory fakes.

pub mod accounts;
pub mod error;
pub mod generate;
pub mod projects;
pub mod publish;
pub mod session;
pub mod state;
pub(crate) mod validation;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::ApiResult;
pub use state::HttpState;
