//! API Module
//!
//! HTTP handlers and routing for the admin REST API.
//!
//! # Endpoints
//! - `PUT /raw` - Store a raw key
//! - `GET /raw/:key` / `DELETE /raw/:key` - Fetch or delete a raw key
//! - `GET /buckets/:name/count` - Count bucket members
//! - `GET /buckets/:name/keys` - List bucket member keys
//! - `DELETE /buckets/:name` - Empty a bucket
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
