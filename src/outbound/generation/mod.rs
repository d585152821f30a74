//! Outbound adapter for the external text-generation endpoint.

mod pollinations;

pub use pollinations::{PollinationsSource, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
