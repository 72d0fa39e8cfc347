use prep_core::model::{InterviewRecord, UserId};

use super::SqliteRepository;
use super::mapping::{conn, finalized_to_i64, map_interview_row, techstack_to_json};
use crate::repository::{InterviewRepository, LatestInterviewsQuery, StorageError};

const INTERVIEW_COLUMNS: &str =
    "id, owner_id, role, interview_type, techstack, company, finalized, created_at";

fn map_rows(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<InterviewRecord>, StorageError> {
    rows.iter().map(map_interview_row).collect()
}

#[async_trait::async_trait]
impl InterviewRepository for SqliteRepository {
    async fn upsert_interview(&self, record: &InterviewRecord) -> Result<(), StorageError> {
        // A NULL id never conflicts, so id-less records are always appended.
        sqlx::query(
            r"
                INSERT INTO interviews (
                    id, owner_id, role, interview_type, techstack,
                    company, finalized, created_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(id) DO UPDATE SET
                    owner_id = excluded.owner_id,
                    role = excluded.role,
                    interview_type = excluded.interview_type,
                    techstack = excluded.techstack,
                    company = excluded.company,
                    finalized = excluded.finalized,
                    created_at = excluded.created_at
            ",
        )
        .bind(record.id.as_deref())
        .bind(record.owner_id.as_str())
        .bind(record.role.as_str())
        .bind(record.interview_type.as_str())
        .bind(techstack_to_json(&record.techstack)?)
        .bind(record.company.as_deref())
        .bind(finalized_to_i64(record.finalized))
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn interviews_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<InterviewRecord>, StorageError> {
        let sql = format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews \
             WHERE owner_id = ?1 \
             ORDER BY created_at DESC, row_id ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(user_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;
        map_rows(&rows)
    }

    async fn latest_interviews(
        &self,
        query: &LatestInterviewsQuery,
    ) -> Result<Vec<InterviewRecord>, StorageError> {
        let sql = format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews \
             WHERE finalized = 1 AND owner_id <> ?1 \
               AND id IS NOT NULL AND trim(id) <> '' \
             ORDER BY created_at DESC, row_id ASC \
             LIMIT ?2"
        );
        let rows = sqlx::query(&sql)
            .bind(query.user_id.as_str())
            .bind(i64::from(query.limit))
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;
        tracing::debug!(
            user_id = %query.user_id,
            limit = query.limit,
            rows = rows.len(),
            "loaded latest interviews"
        );
        map_rows(&rows)
    }
}
