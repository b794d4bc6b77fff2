/// Nexa Terminal service library
///
/// REST backend for the Nexa business terminal: accounts and company
/// profiles, legal document generation, investment/news/blog listings, a
/// social feed, company verification, newsletter and contact inbox.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `routes`: route table and extractor configuration
/// - `services`: business logic, one service per area
/// - `models`: storage models and response DTOs
/// - `db`: repository traits with MongoDB and in-memory stores
/// - `cache`: in-process TTL cache
/// - `state`: shared application state
/// - `config`: layered configuration
/// - `error`: error types and HTTP mapping
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;
