//! API Module
//!
//! HTTP handlers and routing for the cache REST API.
//!
//! # Endpoints
//! - `PUT /set` - Store a key-value pair
//! - `GET /get/:key` - Retrieve a value by key
//! - `DELETE /del/:key` - Delete a key
//! - `GET /keys` - List non-expired keys
//! - `GET /contains/:key` - Check whether a key is cached
//! - `POST /flush` - Remove every entry
//! - `GET /copy` - Snapshot of every entry
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
