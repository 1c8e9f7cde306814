/// Post Service Library
///
/// CRUD and social-interaction operations over the post aggregate: create,
/// read, delete, like/unlike, comment add/remove. Likes and comments are
/// embedded in the post document; every mutation is a read-modify-write of
/// the whole document guarded by an optimistic version check.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and input DTOs
/// - `models`: Post, Like, Comment document structures
/// - `domain`: aggregate mutation operations (pure, no I/O)
/// - `services`: business logic layer orchestrating store and aggregate
/// - `db`: post store trait plus PostgreSQL and in-memory implementations
/// - `middleware`: bearer-token caller identification
/// - `auth`: RS256 JWT validation helpers
/// - `error`: error types and HTTP response mapping
/// - `config`: environment-driven configuration
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
