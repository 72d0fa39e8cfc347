use futures::future::try_join_all;
use prep_core::Classification;
use prep_core::model::{Interview, UserId};
use storage::repository::{FeedbackRepository, StorageError};

/// Split owned interviews by feedback existence.
///
/// One lookup per interview, all in flight at once; results are joined back
/// in the order of `owned`.
pub(crate) async fn classify_owned(
    owned: Vec<Interview>,
    user_id: &UserId,
    feedback: &dyn FeedbackRepository,
) -> Result<Classification, StorageError> {
    if owned.is_empty() {
        return Ok(Classification::default());
    }

    let checks = owned
        .iter()
        .map(|interview| feedback.has_feedback(interview.id(), user_id));
    let flags = try_join_all(checks).await?;

    let classification = Classification::from_checks(owned.into_iter().zip(flags));
    tracing::debug!(
        %user_id,
        taken = classification.taken.len(),
        available = classification.available.len(),
        "classified owned interviews"
    );
    Ok(classification)
}
