//! Per-tenant short-name allocation.
//!
//! Derives short, upper-case, collision-free aliases from long resource names
//! and serves them over HTTP for tenant-scoped resources stored in Postgres.

pub mod app;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod types;
pub mod utils;
pub mod validations;

pub use models::{Attributed, SHORT_NAME_ATTRIBUTE};
pub use services::short_name::{
    allocate_short_name, allocate_with_rng, assign_short_name, search, SearchParameters,
};
pub use utils::tokenizer::tokenize;
