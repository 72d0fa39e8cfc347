use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{InterviewId, UserId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FeedbackError {
    #[error("total score must be between 0 and 100, got {0}")]
    ScoreOutOfRange(u32),
}

/// Evaluation a user received for one interview.
///
/// The dashboard only cares whether one exists for an (interview, user) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRecord {
    interview_id: InterviewId,
    user_id: UserId,
    total_score: u8,
    created_at: DateTime<Utc>,
}

impl FeedbackRecord {
    /// # Errors
    ///
    /// Returns `FeedbackError::ScoreOutOfRange` if `total_score` exceeds 100.
    pub fn new(
        interview_id: InterviewId,
        user_id: UserId,
        total_score: u32,
        created_at: DateTime<Utc>,
    ) -> Result<Self, FeedbackError> {
        let total_score = u8::try_from(total_score)
            .ok()
            .filter(|score| *score <= 100)
            .ok_or(FeedbackError::ScoreOutOfRange(total_score))?;
        Ok(Self {
            interview_id,
            user_id,
            total_score,
            created_at,
        })
    }

    #[must_use]
    pub fn interview_id(&self) -> &InterviewId {
        &self.interview_id
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub fn total_score(&self) -> u8 {
        self.total_score
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
