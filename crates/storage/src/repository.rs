use async_trait::async_trait;
use prep_core::model::{FeedbackRecord, InterviewId, InterviewRecord, User, UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Default number of interviews returned by [`InterviewRepository::latest_interviews`].
pub const DEFAULT_POOL_LIMIT: u32 = 20;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Parameters for the "latest interviews" pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestInterviewsQuery {
    pub user_id: UserId,
    pub limit: u32,
}

impl LatestInterviewsQuery {
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            limit: DEFAULT_POOL_LIMIT,
        }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// Resolves the user behind the current request, if any.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Returns `Ok(None)` when nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the identity backend cannot be reached.
    async fn current_user(&self) -> Result<Option<User>, StorageError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the user cannot be stored.
    async fn upsert_user(&self, user: &User) -> Result<(), StorageError>;

    /// Fetch a user by ID, `Ok(None)` if missing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, StorageError>;
}

/// Repository contract for interviews.
#[async_trait]
pub trait InterviewRepository: Send + Sync {
    /// Persist or update an interview record.
    ///
    /// Records without an id are appended as-is.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn upsert_interview(&self, record: &InterviewRecord) -> Result<(), StorageError>;

    /// Interviews owned by `user_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn interviews_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<InterviewRecord>, StorageError>;

    /// Finalized interviews owned by someone other than `query.user_id`,
    /// newest first, at most `query.limit`.
    ///
    /// Records with a missing or blank id are skipped before the limit
    /// applies, so they never take a slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn latest_interviews(
        &self,
        query: &LatestInterviewsQuery,
    ) -> Result<Vec<InterviewRecord>, StorageError>;
}

/// Repository contract for interview feedback.
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Persist feedback, replacing any existing entry for the same (interview, user).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the feedback cannot be stored.
    async fn upsert_feedback(&self, feedback: &FeedbackRecord) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn feedback_for(
        &self,
        interview_id: &InterviewId,
        user_id: &UserId,
    ) -> Result<Option<FeedbackRecord>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn has_feedback(
        &self,
        interview_id: &InterviewId,
        user_id: &UserId,
    ) -> Result<bool, StorageError> {
        Ok(self.feedback_for(interview_id, user_id).await?.is_some())
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    session: Arc<Mutex<Option<UserId>>>,
    users: Arc<Mutex<HashMap<UserId, User>>>,
    interviews: Arc<Mutex<Vec<InterviewRecord>>>,
    feedback: Arc<Mutex<HashMap<(InterviewId, UserId), FeedbackRecord>>>,
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn has_usable_id(record: &InterviewRecord) -> bool {
    record.id.as_deref().is_some_and(|id| !id.trim().is_empty())
}

fn newest_first(records: &mut [InterviewRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `user_id` as the signed-in user for [`IdentityProvider::current_user`].
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the session lock is poisoned.
    pub fn sign_in(&self, user_id: UserId) -> Result<(), StorageError> {
        *self.session.lock().map_err(poisoned)? = Some(user_id);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the session lock is poisoned.
    pub fn sign_out(&self) -> Result<(), StorageError> {
        *self.session.lock().map_err(poisoned)? = None;
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for InMemoryRepository {
    async fn current_user(&self) -> Result<Option<User>, StorageError> {
        let session = self.session.lock().map_err(poisoned)?.clone();
        let Some(user_id) = session else {
            return Ok(None);
        };
        self.get_user(&user_id).await
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn upsert_user(&self, user: &User) -> Result<(), StorageError> {
        let mut guard = self.users.lock().map_err(poisoned)?;
        guard.insert(user.id().clone(), user.clone());
        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        let guard = self.users.lock().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }
}

#[async_trait]
impl InterviewRepository for InMemoryRepository {
    async fn upsert_interview(&self, record: &InterviewRecord) -> Result<(), StorageError> {
        let mut guard = self.interviews.lock().map_err(poisoned)?;
        let existing = record
            .id
            .as_ref()
            .and_then(|id| guard.iter().position(|r| r.id.as_ref() == Some(id)));
        match existing {
            Some(idx) => guard[idx] = record.clone(),
            None => guard.push(record.clone()),
        }
        Ok(())
    }

    async fn interviews_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<InterviewRecord>, StorageError> {
        let guard = self.interviews.lock().map_err(poisoned)?;
        let mut out: Vec<_> = guard
            .iter()
            .filter(|r| &r.owner_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut out);
        Ok(out)
    }

    async fn latest_interviews(
        &self,
        query: &LatestInterviewsQuery,
    ) -> Result<Vec<InterviewRecord>, StorageError> {
        let guard = self.interviews.lock().map_err(poisoned)?;
        let mut out: Vec<_> = guard
            .iter()
            .filter(|r| r.finalized && r.owner_id != query.user_id && has_usable_id(r))
            .cloned()
            .collect();
        newest_first(&mut out);
        out.truncate(query.limit as usize);
        Ok(out)
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryRepository {
    async fn upsert_feedback(&self, feedback: &FeedbackRecord) -> Result<(), StorageError> {
        let mut guard = self.feedback.lock().map_err(poisoned)?;
        guard.insert(
            (feedback.interview_id().clone(), feedback.user_id().clone()),
            feedback.clone(),
        );
        Ok(())
    }

    async fn feedback_for(
        &self,
        interview_id: &InterviewId,
        user_id: &UserId,
    ) -> Result<Option<FeedbackRecord>, StorageError> {
        let guard = self.feedback.lock().map_err(poisoned)?;
        Ok(guard
            .get(&(interview_id.clone(), user_id.clone()))
            .cloned())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserRepository>,
    pub interviews: Arc<dyn InterviewRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
}

impl Storage {
    #[must_use]
    pub fn from_in_memory(repo: &InMemoryRepository) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(repo.clone());
        let interviews: Arc<dyn InterviewRepository> = Arc::new(repo.clone());
        let feedback: Arc<dyn FeedbackRepository> = Arc::new(repo.clone());
        Self {
            users,
            interviews,
            feedback,
        }
    }
}
