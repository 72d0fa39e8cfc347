use std::env;

use storage::repository::DEFAULT_POOL_LIMIT;

/// Tunables for building the dashboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Upper bound on "latest interviews" pulled into the available pool.
    pub pool_limit: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            pool_limit: DEFAULT_POOL_LIMIT,
        }
    }
}

impl DashboardConfig {
    /// Reads `PREPWISE_POOL_LIMIT`, falling back to the default when unset or invalid.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_pool_limit(env::var("PREPWISE_POOL_LIMIT").ok().as_deref())
    }

    fn from_pool_limit(raw: Option<&str>) -> Self {
        let pool_limit = raw
            .and_then(|value| value.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_POOL_LIMIT);
        Self { pool_limit }
    }

    #[must_use]
    pub fn with_pool_limit(mut self, pool_limit: u32) -> Self {
        self.pool_limit = pool_limit;
        self
    }
}
