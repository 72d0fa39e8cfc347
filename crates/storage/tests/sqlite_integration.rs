use chrono::Duration;
use prep_core::model::{FeedbackRecord, InterviewId, InterviewRecord, User, UserId};
use prep_core::time::fixed_now;
use storage::repository::{
    FeedbackRepository, InterviewRepository, LatestInterviewsQuery, UserRepository,
};
use storage::sqlite::SqliteRepository;

fn user_id(raw: &str) -> UserId {
    UserId::new(raw).unwrap()
}

fn record(id: Option<&str>, owner: &str, minutes_ago: i64, finalized: bool) -> InterviewRecord {
    InterviewRecord {
        id: id.map(str::to_owned),
        owner_id: user_id(owner),
        role: "Platform Engineer".into(),
        interview_type: "Mixed".into(),
        techstack: vec!["Go".into(), "gRPC".into()],
        company: Some("Hooli".into()),
        finalized,
        created_at: fixed_now() - Duration::minutes(minutes_ago),
    }
}

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_roundtrips_users_and_interviews() {
    let repo = connect("memdb_roundtrip").await;

    let user = User::new(user_id("me"), "Me", Some("me@example.com".into())).unwrap();
    repo.upsert_user(&user).await.unwrap();
    assert_eq!(repo.get_user(&user_id("me")).await.unwrap(), Some(user));
    assert_eq!(repo.get_user(&user_id("nobody")).await.unwrap(), None);

    let original = record(Some("i-1"), "me", 5, true);
    repo.upsert_interview(&original).await.unwrap();

    let owned = repo.interviews_by_user(&user_id("me")).await.unwrap();
    assert_eq!(owned, vec![original]);
}

#[tokio::test]
async fn sqlite_keeps_rows_without_id() {
    let repo = connect("memdb_null_ids").await;

    repo.upsert_interview(&record(None, "me", 1, false)).await.unwrap();
    repo.upsert_interview(&record(None, "me", 2, false)).await.unwrap();
    repo.upsert_interview(&record(Some("i-1"), "me", 3, false)).await.unwrap();
    repo.upsert_interview(&record(Some("i-1"), "me", 3, true)).await.unwrap();

    let owned = repo.interviews_by_user(&user_id("me")).await.unwrap();
    let ids: Vec<_> = owned.iter().map(|r| r.id.as_deref()).collect();
    assert_eq!(ids, [None, None, Some("i-1")]);
    assert!(owned[2].finalized);
}

#[tokio::test]
async fn sqlite_latest_interviews_filters_and_limits() {
    let repo = connect("memdb_latest").await;

    repo.upsert_interview(&record(Some("mine"), "me", 1, true)).await.unwrap();
    repo.upsert_interview(&record(Some("draft"), "you", 2, false)).await.unwrap();
    repo.upsert_interview(&record(Some("newer"), "you", 3, true)).await.unwrap();
    repo.upsert_interview(&record(Some("older"), "them", 4, true)).await.unwrap();
    repo.upsert_interview(&record(Some("oldest"), "them", 5, true)).await.unwrap();

    let query = LatestInterviewsQuery::new(user_id("me")).with_limit(2);
    let pool = repo.latest_interviews(&query).await.unwrap();
    let ids: Vec<_> = pool.iter().map(|r| r.id.as_deref()).collect();
    assert_eq!(ids, [Some("newer"), Some("older")]);
}

#[tokio::test]
async fn sqlite_latest_interviews_ignore_rows_without_id() {
    let repo = connect("memdb_latest_no_id").await;

    repo.upsert_interview(&record(None, "you", 1, true)).await.unwrap();
    repo.upsert_interview(&record(Some(""), "you", 2, true)).await.unwrap();
    repo.upsert_interview(&record(Some("a"), "you", 3, true)).await.unwrap();
    repo.upsert_interview(&record(Some("b"), "them", 4, true)).await.unwrap();

    let query = LatestInterviewsQuery::new(user_id("me")).with_limit(2);
    let pool = repo.latest_interviews(&query).await.unwrap();
    let ids: Vec<_> = pool.iter().map(|r| r.id.as_deref()).collect();
    assert_eq!(ids, [Some("a"), Some("b")]);
}

#[tokio::test]
async fn sqlite_feedback_lookup_by_interview_and_user() {
    let repo = connect("memdb_feedback").await;
    let interview_id = InterviewId::new("i-1").unwrap();

    let feedback =
        FeedbackRecord::new(interview_id.clone(), user_id("me"), 64, fixed_now()).unwrap();
    repo.upsert_feedback(&feedback).await.unwrap();
    let rescored =
        FeedbackRecord::new(interview_id.clone(), user_id("me"), 91, fixed_now()).unwrap();
    repo.upsert_feedback(&rescored).await.unwrap();

    let fetched = repo
        .feedback_for(&interview_id, &user_id("me"))
        .await
        .unwrap()
        .expect("feedback stored");
    assert_eq!(fetched.total_score(), 91);
    assert!(repo.has_feedback(&interview_id, &user_id("me")).await.unwrap());
    assert!(!repo.has_feedback(&interview_id, &user_id("you")).await.unwrap());
}
