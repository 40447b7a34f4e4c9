//! # ProjectHub API Server Library
//!
//! HTTP transport for ProjectHub: an axum router exposing the GraphQL
//! endpoint, with tenant resolution in front of it.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Layered configuration
//! - `error`: HTTP error responses
//! - `graphql`: Schema, resolvers and handlers
//! - `middleware`: Tenant resolution
//! - `routes`: Info and health endpoints

pub mod app;
pub mod config;
pub mod error;
pub mod graphql;
pub mod middleware;
pub mod routes;
