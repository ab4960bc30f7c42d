//! Core types shared across the crate.
//!
//! - **IDs**: Strongly-typed identifiers (SubscriptionId)
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Router and observability configuration

mod config;
mod errors;
mod ids;

pub use config::{Config, ObservabilityConfig, RouterConfig};
pub use errors::{Error, Result};
pub use ids::SubscriptionId;
