use std::sync::Arc;

use async_trait::async_trait;
use prep_core::model::{User, UserId};

use crate::repository::{IdentityProvider, StorageError, UserRepository};

/// Identity provider for a process that serves a single session.
///
/// The session user id comes from configuration; it resolves to `None` when
/// no id is configured or the id is unknown to the user repository.
#[derive(Clone)]
pub struct SessionIdentity {
    user_id: Option<UserId>,
    users: Arc<dyn UserRepository>,
}

impl SessionIdentity {
    #[must_use]
    pub fn new(user_id: Option<UserId>, users: Arc<dyn UserRepository>) -> Self {
        Self { user_id, users }
    }
}

#[async_trait]
impl IdentityProvider for SessionIdentity {
    async fn current_user(&self) -> Result<Option<User>, StorageError> {
        let Some(user_id) = &self.user_id else {
            return Ok(None);
        };
        let user = self.users.get_user(user_id).await?;
        if user.is_none() {
            tracing::debug!(%user_id, "session user is not registered");
        }
        Ok(user)
    }
}
