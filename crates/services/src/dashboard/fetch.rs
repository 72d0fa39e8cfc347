use prep_core::NormalizedBatch;
use prep_core::model::UserId;
use storage::repository::{InterviewRepository, LatestInterviewsQuery, StorageError};

/// Owned interviews and the latest-interviews pool for one user, validated.
pub(crate) struct Sources {
    pub owned: NormalizedBatch,
    pub pool: NormalizedBatch,
}

/// Issue the owned and pool retrievals together and wait for both.
///
/// The first failure is returned as-is.
pub(crate) async fn fetch_sources(
    user_id: &UserId,
    interviews: &dyn InterviewRepository,
    pool_limit: u32,
) -> Result<Sources, StorageError> {
    let query = LatestInterviewsQuery::new(user_id.clone()).with_limit(pool_limit);
    let (owned, pool) = futures::try_join!(
        interviews.interviews_by_user(user_id),
        interviews.latest_interviews(&query),
    )?;

    let sources = Sources {
        owned: NormalizedBatch::from_records(owned),
        pool: NormalizedBatch::from_records(pool),
    };

    let dropped = sources.owned.dropped + sources.pool.dropped;
    if dropped > 0 {
        tracing::warn!(%user_id, dropped, "skipping interview records without an id");
    }
    tracing::debug!(
        %user_id,
        owned = sources.owned.valid.len(),
        pool = sources.pool.valid.len(),
        "fetched dashboard sources"
    );
    Ok(sources)
}
