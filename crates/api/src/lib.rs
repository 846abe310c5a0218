//! HTTP API: server, routing, and request/response mapping.
//!
//! This layer is a thin consumer of the core crates: it binds requests,
//! calls the token lifecycle / policy repository, and maps typed errors to
//! status codes. No token or policy logic lives here.

pub mod app;
pub mod config;
pub mod directory;
pub mod errors;
pub mod middleware;
pub mod routes;
