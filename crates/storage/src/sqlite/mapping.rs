use chrono::{DateTime, Utc};
use prep_core::model::{FeedbackRecord, InterviewId, InterviewRecord, User, UserId};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn user_id_from_str(raw: String) -> Result<UserId, StorageError> {
    UserId::new(raw).map_err(ser)
}

pub(crate) fn interview_id_from_str(raw: String) -> Result<InterviewId, StorageError> {
    InterviewId::new(raw).map_err(ser)
}

/// Techstack is stored as a JSON array of strings.
pub(crate) fn techstack_to_json(techstack: &[String]) -> Result<String, StorageError> {
    serde_json::to_string(techstack).map_err(ser)
}

pub(crate) fn techstack_from_json(raw: &str) -> Result<Vec<String>, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}

pub(crate) fn finalized_to_i64(finalized: bool) -> i64 {
    i64::from(finalized)
}

pub(crate) fn finalized_from_i64(value: i64) -> Result<bool, StorageError> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(StorageError::Serialization(format!(
            "invalid finalized flag: {other}"
        ))),
    }
}

pub(crate) fn map_user_row(row: &SqliteRow) -> Result<User, StorageError> {
    User::new(
        user_id_from_str(row.try_get("id").map_err(ser)?)?,
        row.try_get::<String, _>("name").map_err(ser)?,
        row.try_get("email").map_err(ser)?,
    )
    .map_err(ser)
}

/// Maps an interview row without validating its id; that happens upstream.
pub(crate) fn map_interview_row(row: &SqliteRow) -> Result<InterviewRecord, StorageError> {
    let techstack: String = row.try_get("techstack").map_err(ser)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(ser)?;

    Ok(InterviewRecord {
        id: row.try_get("id").map_err(ser)?,
        owner_id: user_id_from_str(row.try_get("owner_id").map_err(ser)?)?,
        role: row.try_get("role").map_err(ser)?,
        interview_type: row.try_get("interview_type").map_err(ser)?,
        techstack: techstack_from_json(&techstack)?,
        company: row.try_get("company").map_err(ser)?,
        finalized: finalized_from_i64(row.try_get("finalized").map_err(ser)?)?,
        created_at,
    })
}

pub(crate) fn map_feedback_row(row: &SqliteRow) -> Result<FeedbackRecord, StorageError> {
    let total_score: i64 = row.try_get("total_score").map_err(ser)?;
    let total_score = u32::try_from(total_score)
        .map_err(|_| StorageError::Serialization(format!("invalid total_score: {total_score}")))?;

    FeedbackRecord::new(
        interview_id_from_str(row.try_get("interview_id").map_err(ser)?)?,
        user_id_from_str(row.try_get("user_id").map_err(ser)?)?,
        total_score,
        row.try_get("created_at").map_err(ser)?,
    )
    .map_err(ser)
}
