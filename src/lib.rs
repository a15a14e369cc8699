//! Doc Cache - An expiring key-value cache over a document store
//!
//! Provides an in-process memo in front of a shared document collection,
//! with TTL expiration on the stored timestamps and an HTTP front end.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::{Cache, CacheRecord};
pub use config::{Config, ConnectionSpec};
pub use error::{CacheError, Result};
pub use store::{DocumentStore, MemoryStore, MongoStore};
pub use tasks::spawn_sweep_task;
