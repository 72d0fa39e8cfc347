use prep_core::model::{FeedbackRecord, InterviewId, UserId};

use super::SqliteRepository;
use super::mapping::{conn, map_feedback_row};
use crate::repository::{FeedbackRepository, StorageError};

#[async_trait::async_trait]
impl FeedbackRepository for SqliteRepository {
    async fn upsert_feedback(&self, feedback: &FeedbackRecord) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO feedback (interview_id, user_id, total_score, created_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(interview_id, user_id) DO UPDATE SET
                    total_score = excluded.total_score,
                    created_at = excluded.created_at
            ",
        )
        .bind(feedback.interview_id().as_str())
        .bind(feedback.user_id().as_str())
        .bind(i64::from(feedback.total_score()))
        .bind(feedback.created_at())
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn feedback_for(
        &self,
        interview_id: &InterviewId,
        user_id: &UserId,
    ) -> Result<Option<FeedbackRecord>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT interview_id, user_id, total_score, created_at
                FROM feedback
                WHERE interview_id = ?1 AND user_id = ?2
            ",
        )
        .bind(interview_id.as_str())
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_feedback_row).transpose()
    }

    async fn has_feedback(
        &self,
        interview_id: &InterviewId,
        user_id: &UserId,
    ) -> Result<bool, StorageError> {
        let row = sqlx::query("SELECT 1 FROM feedback WHERE interview_id = ?1 AND user_id = ?2")
            .bind(interview_id.as_str())
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;
        Ok(row.is_some())
    }
}
