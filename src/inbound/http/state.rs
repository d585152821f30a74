//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountService, GenerationSource};
use crate::domain::ProjectService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub projects: ProjectService,
    pub generation: Arc<dyn GenerationSource>,
}

impl HttpState {
    /// Construct state from the three port implementations.
    pub fn new(
        accounts: Arc<dyn AccountService>,
        projects: ProjectService,
        generation: Arc<dyn GenerationSource>,
    ) -> Self {
        Self {
            accounts,
            projects,
            generation,
        }
    }
}
