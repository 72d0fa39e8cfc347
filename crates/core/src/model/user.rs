use thiserror::Error;

use crate::model::ids::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UserError {
    #[error("user name cannot be empty")]
    EmptyName,
}

/// A signed-in user as resolved by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: String,
    email: Option<String>,
}

impl User {
    /// Build a user with a trimmed, non-empty display name.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmptyName` if the name is blank.
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: Option<String>,
    ) -> Result<Self, UserError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(UserError::EmptyName);
        }
        let email = email
            .map(|e| e.trim().to_owned())
            .filter(|e| !e.is_empty());
        Ok(Self {
            id,
            name: name.to_owned(),
            email,
        })
    }

    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
