use std::sync::Arc;

use prep_core::model::UserId;
use storage::identity::SessionIdentity;
use storage::repository::{IdentityProvider, Storage};

use crate::config::DashboardConfig;
use crate::dashboard::DashboardService;
use crate::error::AppServicesError;

/// Assembles app-facing services over a storage backend.
#[derive(Clone)]
pub struct AppServices {
    dashboard: Arc<DashboardService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage for a single session.
    ///
    /// `session_user` is the raw signed-in user id; `None` means signed out.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the
    /// session user id is blank.
    pub async fn new_sqlite(
        db_url: &str,
        session_user: Option<&str>,
        config: DashboardConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let session_user = session_user.map(UserId::new).transpose()?;
        let identity: Arc<dyn IdentityProvider> = Arc::new(SessionIdentity::new(
            session_user,
            Arc::clone(&storage.users),
        ));
        Ok(Self::from_storage(&storage, identity, config))
    }

    #[must_use]
    pub fn from_storage(
        storage: &Storage,
        identity: Arc<dyn IdentityProvider>,
        config: DashboardConfig,
    ) -> Self {
        let dashboard = Arc::new(DashboardService::new(
            identity,
            Arc::clone(&storage.interviews),
            Arc::clone(&storage.feedback),
            config,
        ));
        Self { dashboard }
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }
}
