//! Cache Module
//!
//! Provides the expiring cache engine: an in-process memo in front of a
//! document store, with TTL expiration on the store timestamps.

pub mod codec;
mod engine;
mod policy;
mod record;
mod stats;


// Re-export public types
pub use engine::Cache;
pub use policy::ExpirationPolicy;
pub use record::{current_timestamp, CacheRecord};
pub use stats::CacheStats;
