//! Driving adapters that expose the domain over external interfaces.

pub mod http;
