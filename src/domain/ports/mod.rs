//! Domain ports for the hexagonal boundary.
//!
//! Inbound adapters depend on these traits only; outbound adapters implement
//! them. Port error enums carry infrastructure failures upward without
//! leaking Diesel or Reqwest types into the domain.

mod account_service;
mod generation_source;
mod project_store;

pub use account_service::{AccountService, AccountServiceError};
pub use generation_source::{GenerationSource, GenerationSourceError};
pub use project_store::{ProjectStore, ProjectStoreError};
