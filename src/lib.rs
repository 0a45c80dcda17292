//! Restaurant discovery API
//!
//! A REST JSON API for looking up restaurants, searching them by city,
//! cuisine and free text, and resolving callers from identity provider
//! bearer tokens.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}
