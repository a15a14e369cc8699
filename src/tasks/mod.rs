//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry sweep: Purges expired records from the store and the memo

mod sweep;

pub use sweep::spawn_sweep_task;
