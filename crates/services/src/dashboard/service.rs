use std::sync::Arc;

use prep_core::Partition;
use prep_core::model::UserId;
use storage::repository::{FeedbackRepository, IdentityProvider, InterviewRepository};

use super::classify::classify_owned;
use super::fetch::fetch_sources;
use super::view::{Dashboard, DashboardView};
use crate::config::DashboardConfig;
use crate::error::DashboardError;

/// Builds the home dashboard: which interviews the user can take and which
/// they already took.
///
/// Stateless: every call re-fetches and re-classifies from the stores.
#[derive(Clone)]
pub struct DashboardService {
    identity: Arc<dyn IdentityProvider>,
    interviews: Arc<dyn InterviewRepository>,
    feedback: Arc<dyn FeedbackRepository>,
    config: DashboardConfig,
}

impl DashboardService {
    #[must_use]
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        interviews: Arc<dyn InterviewRepository>,
        feedback: Arc<dyn FeedbackRepository>,
        config: DashboardConfig,
    ) -> Self {
        Self {
            identity,
            interviews,
            feedback,
            config,
        }
    }

    /// Resolve the current user and build their dashboard.
    ///
    /// Returns `Dashboard::SignedOut` without touching the interview or
    /// feedback stores when nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Storage` if any store call fails.
    pub async fn load(&self) -> Result<Dashboard, DashboardError> {
        let Some(user) = self.identity.current_user().await? else {
            tracing::debug!("no signed-in user; skipping dashboard build");
            return Ok(Dashboard::SignedOut);
        };

        let partition = self.partition_for(user.id()).await?;
        tracing::info!(
            user_id = %user.id(),
            available = partition.available_count(),
            taken = partition.taken_count(),
            "dashboard built"
        );
        Ok(Dashboard::Ready(DashboardView::new(user, partition)))
    }

    /// Fetch, classify and merge interviews for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Storage` if any store call fails.
    pub async fn partition_for(&self, user_id: &UserId) -> Result<Partition, DashboardError> {
        let sources =
            fetch_sources(user_id, self.interviews.as_ref(), self.config.pool_limit).await?;
        let classification =
            classify_owned(sources.owned.valid, user_id, self.feedback.as_ref()).await?;
        Ok(Partition::merge(classification, sources.pool.valid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;
    use prep_core::model::{FeedbackRecord, InterviewId, InterviewRecord, User};
    use prep_core::time::fixed_now;
    use storage::repository::{
        InMemoryRepository, LatestInterviewsQuery, StorageError, UserRepository,
    };

    fn user_id(raw: &str) -> UserId {
        UserId::new(raw).unwrap()
    }

    fn record(id: Option<&str>, owner: &str, minutes_ago: i64) -> InterviewRecord {
        InterviewRecord {
            id: id.map(str::to_owned),
            owner_id: user_id(owner),
            role: "Software Engineer".into(),
            interview_type: "Technical".into(),
            techstack: vec!["Rust".into()],
            company: None,
            finalized: true,
            created_at: fixed_now() - ChronoDuration::minutes(minutes_ago),
        }
    }

    async fn signed_in_repo() -> InMemoryRepository {
        let repo = InMemoryRepository::new();
        let me = User::new(user_id("me"), "Me", None).unwrap();
        repo.upsert_user(&me).await.unwrap();
        repo.sign_in(user_id("me")).unwrap();
        repo
    }

    async fn give_feedback(repo: &InMemoryRepository, interview: &str) {
        let feedback = FeedbackRecord::new(
            InterviewId::new(interview).unwrap(),
            user_id("me"),
            70,
            fixed_now(),
        )
        .unwrap();
        repo.upsert_feedback(&feedback).await.unwrap();
    }

    fn service(repo: &InMemoryRepository) -> DashboardService {
        DashboardService::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            DashboardConfig::default(),
        )
    }

    fn ids(interviews: &[prep_core::model::Interview]) -> Vec<&str> {
        interviews.iter().map(|i| i.id().as_str()).collect()
    }

    #[tokio::test]
    async fn taken_and_available_with_pool() {
        let repo = signed_in_repo().await;
        repo.upsert_interview(&record(Some("1"), "me", 1)).await.unwrap();
        repo.upsert_interview(&record(Some("2"), "me", 2)).await.unwrap();
        repo.upsert_interview(&record(Some("3"), "other", 3)).await.unwrap();
        give_feedback(&repo, "1").await;

        let dashboard = service(&repo).load().await.unwrap();

        assert_eq!(ids(dashboard.taken()), ["1"]);
        assert_eq!(ids(dashboard.available()), ["2", "3"]);
        assert_eq!((dashboard.available_count(), dashboard.taken_count()), (2, 1));
    }

    #[tokio::test]
    async fn pool_only_when_nothing_owned() {
        let repo = signed_in_repo().await;
        repo.upsert_interview(&record(Some("5"), "other", 1)).await.unwrap();

        let dashboard = service(&repo).load().await.unwrap();

        assert_eq!(ids(dashboard.available()), ["5"]);
        assert!(dashboard.taken().is_empty());
        assert_eq!((dashboard.available_count(), dashboard.taken_count()), (1, 0));
    }

    #[tokio::test]
    async fn signed_out_yields_empty_dashboard() {
        let repo = InMemoryRepository::new();
        repo.upsert_interview(&record(Some("5"), "other", 1)).await.unwrap();

        let dashboard = service(&repo).load().await.unwrap();

        assert_eq!(dashboard, Dashboard::SignedOut);
        assert_eq!((dashboard.available_count(), dashboard.taken_count()), (0, 0));
    }

    #[tokio::test]
    async fn records_without_id_are_excluded() {
        let repo = signed_in_repo().await;
        repo.upsert_interview(&record(None, "me", 1)).await.unwrap();
        repo.upsert_interview(&record(Some("ok"), "me", 2)).await.unwrap();
        repo.upsert_interview(&record(Some(" "), "other", 3)).await.unwrap();

        let dashboard = service(&repo).load().await.unwrap();

        assert_eq!(ids(dashboard.available()), ["ok"]);
        assert!(dashboard.taken().is_empty());
    }

    #[tokio::test]
    async fn repeated_loads_see_new_feedback() {
        let repo = signed_in_repo().await;
        repo.upsert_interview(&record(Some("1"), "me", 1)).await.unwrap();
        let svc = service(&repo);

        let before = svc.load().await.unwrap();
        assert_eq!((before.available_count(), before.taken_count()), (1, 0));

        give_feedback(&repo, "1").await;
        let after = svc.load().await.unwrap();
        assert_eq!((after.available_count(), after.taken_count()), (0, 1));
    }

    /// Pool that does not exclude the caller's own interviews.
    struct SelfIncludingPool(InMemoryRepository);

    #[async_trait]
    impl InterviewRepository for SelfIncludingPool {
        async fn upsert_interview(&self, record: &InterviewRecord) -> Result<(), StorageError> {
            self.0.upsert_interview(record).await
        }

        async fn interviews_by_user(
            &self,
            user_id: &UserId,
        ) -> Result<Vec<InterviewRecord>, StorageError> {
            self.0.interviews_by_user(user_id).await
        }

        async fn latest_interviews(
            &self,
            query: &LatestInterviewsQuery,
        ) -> Result<Vec<InterviewRecord>, StorageError> {
            let mut pool = self.0.interviews_by_user(&query.user_id).await?;
            pool.extend(self.0.latest_interviews(query).await?);
            Ok(pool)
        }
    }

    #[tokio::test]
    async fn pool_overlapping_owned_is_deduped() {
        let repo = signed_in_repo().await;
        repo.upsert_interview(&record(Some("7"), "me", 1)).await.unwrap();
        repo.upsert_interview(&record(Some("8"), "me", 2)).await.unwrap();
        give_feedback(&repo, "8").await;

        let svc = DashboardService::new(
            Arc::new(repo.clone()),
            Arc::new(SelfIncludingPool(repo.clone())),
            Arc::new(repo.clone()),
            DashboardConfig::default(),
        );
        let dashboard = svc.load().await.unwrap();

        assert_eq!(ids(dashboard.available()), ["7"]);
        assert_eq!(ids(dashboard.taken()), ["8"]);
    }

    struct UnavailableFeedback;

    #[async_trait]
    impl FeedbackRepository for UnavailableFeedback {
        async fn upsert_feedback(&self, _feedback: &FeedbackRecord) -> Result<(), StorageError> {
            Err(StorageError::Connection("feedback store offline".into()))
        }

        async fn feedback_for(
            &self,
            _interview_id: &InterviewId,
            _user_id: &UserId,
        ) -> Result<Option<FeedbackRecord>, StorageError> {
            Err(StorageError::Connection("feedback store offline".into()))
        }
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let repo = signed_in_repo().await;
        repo.upsert_interview(&record(Some("1"), "me", 1)).await.unwrap();

        let svc = DashboardService::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(UnavailableFeedback),
            DashboardConfig::default(),
        );
        let err = svc.load().await.unwrap_err();

        assert!(matches!(
            err,
            DashboardError::Storage(StorageError::Connection(_))
        ));
    }

    /// Feedback store that tracks how many lookups overlap.
    #[derive(Default)]
    struct SlowFeedback {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl FeedbackRepository for SlowFeedback {
        async fn upsert_feedback(&self, _feedback: &FeedbackRecord) -> Result<(), StorageError> {
            Ok(())
        }

        async fn feedback_for(
            &self,
            _interview_id: &InterviewId,
            _user_id: &UserId,
        ) -> Result<Option<FeedbackRecord>, StorageError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(None)
        }
    }

    #[tokio::test]
    async fn feedback_checks_run_concurrently_and_keep_order() {
        let repo = signed_in_repo().await;
        for (n, id) in ["a", "b", "c", "d"].into_iter().enumerate() {
            let minutes_ago = i64::try_from(n).unwrap();
            repo.upsert_interview(&record(Some(id), "me", minutes_ago))
                .await
                .unwrap();
        }
        let feedback = Arc::new(SlowFeedback::default());

        let svc = DashboardService::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::clone(&feedback) as Arc<dyn FeedbackRepository>,
            DashboardConfig::default(),
        );
        let partition = svc.partition_for(&user_id("me")).await.unwrap();

        assert_eq!(ids(partition.available()), ["a", "b", "c", "d"]);
        assert_eq!(feedback.peak.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn pool_limit_is_forwarded_to_store() {
        let repo = signed_in_repo().await;
        for (n, id) in ["p1", "p2", "p3"].into_iter().enumerate() {
            let minutes_ago = i64::try_from(n).unwrap();
            repo.upsert_interview(&record(Some(id), "other", minutes_ago))
                .await
                .unwrap();
        }

        let svc = DashboardService::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            DashboardConfig::default().with_pool_limit(2),
        );
        let dashboard = svc.load().await.unwrap();

        assert_eq!(ids(dashboard.available()), ["p1", "p2"]);
    }

    #[tokio::test]
    async fn id_less_pool_rows_do_not_shrink_the_pool() {
        let repo = signed_in_repo().await;
        repo.upsert_interview(&record(None, "other", 0)).await.unwrap();
        repo.upsert_interview(&record(Some("a"), "other", 1)).await.unwrap();
        repo.upsert_interview(&record(Some("b"), "other", 2)).await.unwrap();
        repo.upsert_interview(&record(Some("c"), "other", 3)).await.unwrap();

        let svc = DashboardService::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            DashboardConfig::default().with_pool_limit(2),
        );
        let dashboard = svc.load().await.unwrap();

        assert_eq!(ids(dashboard.available()), ["a", "b"]);
    }
}
