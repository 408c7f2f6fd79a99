//! service-core: Shared infrastructure for the pantry services.
pub mod config;
pub mod error;
pub mod observability;
