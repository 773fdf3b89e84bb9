//! Biblioteca Library Catalog and Lending Manager
//!
//! A Rust server tracking books, editions, physical copies, authors,
//! patrons and loans, built around a transactional cascade engine that
//! keeps the Book -> Edition -> Copy -> Loan hierarchy and the
//! Book <-> Author relation referentially intact.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
