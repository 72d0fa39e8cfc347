//! Shared error types for the services crate.

use thiserror::Error;

use prep_core::model::IdError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `DashboardService`.
///
/// Store failures are passed through untouched; the dashboard does not retry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid session user id: {0}")]
    SessionUser(#[from] IdError),
}
