//! Local library catalog server
//!
//! Keeps a catalog of authors, genres, books and book instances (physical
//! copies), validates and sanitizes submitted forms, refuses to delete
//! records that books still reference, and assembles the data for each
//! catalog page as JSON.

use std::future::Future;
use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod validation;
pub mod views;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Resolve once `signal` fires. If the signal handler cannot be installed
/// the returned future never resolves, so the server keeps running.
pub async fn shutdown_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
