//! # ProjectHub Shared Library
//!
//! Domain core of ProjectHub: the organization → project → task → comment
//! data model, its persistence, and the tenant-scoped services the API
//! server exposes over GraphQL.
//!
//! ## Module Organization
//!
//! - `models`: Entities, inputs and derived statistics
//! - `store`: `EntityStore` trait with PostgreSQL and in-memory backends
//! - `db`: Connection pool and embedded migrations
//! - `access`: Tenant context and ownership checks
//! - `services`: Access-scoped query and mutation services

pub mod access;
pub mod db;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the ProjectHub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
