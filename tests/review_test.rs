mod common;

use campus_activities::database::{activities_repo, notifications_repo};
use campus_activities::error::{Rejection, ServiceError};
use campus_activities::models::Role;
use campus_activities::services::review_service;
use chrono::{Duration, Utc};
use common::{seed_activity, seed_user, ActivitySeed};

async fn pending_activity(pool: &sqlx::SqlitePool, organizer: &str) -> String {
    let start = Utc::now() + Duration::days(3);
    seed_activity(
        pool,
        ActivitySeed {
            organizer_id: organizer,
            venue_id: None,
            type_id: None,
            start_time: start,
            end_time: start + Duration::hours(2),
            max_participants: 20,
            tags: None,
        },
    )
    .await
}

#[tokio::test]
async fn approval_activates_the_activity_and_notifies_the_organizer() {
    let pool = common::test_pool().await;
    let organizer = seed_user(&pool, "organizer", Role::Member).await;
    let reviewer = seed_user(&pool, "reviewer", Role::Reviewer).await;
    let activity = pending_activity(&pool, &organizer).await;

    review_service::decide(&pool, &reviewer, &activity, "approved", "Looks good", Utc::now())
        .await
        .expect("approve");

    let row = activities_repo::find_by_id(&pool, &activity)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.review_status, "approved");
    assert_eq!(row.status, "active");
    assert_eq!(row.is_approved, 1);
    assert_eq!(row.reviewer_id.as_deref(), Some(reviewer.as_str()));
    assert!(row.review_time.is_some());

    let notifications = notifications_repo::list_for_user(&pool, &organizer, 10)
        .await
        .unwrap();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].body.contains("approved"));
    assert!(notifications[0].body.contains("Looks good"));
}

#[tokio::test]
async fn rejection_parks_the_activity() {
    let pool = common::test_pool().await;
    let organizer = seed_user(&pool, "organizer", Role::Member).await;
    let reviewer = seed_user(&pool, "reviewer", Role::Reviewer).await;
    let activity = pending_activity(&pool, &organizer).await;

    review_service::decide(&pool, &reviewer, &activity, "rejected", "Too large", Utc::now())
        .await
        .expect("reject");

    let row = activities_repo::find_by_id(&pool, &activity)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.review_status, "rejected");
    assert_eq!(row.status, "rejected");
    assert_eq!(row.is_approved, 0);
    assert_eq!(row.review_comment.as_deref(), Some("Too large"));
}

#[tokio::test]
async fn a_decision_is_one_shot() {
    let pool = common::test_pool().await;
    let organizer = seed_user(&pool, "organizer", Role::Member).await;
    let reviewer = seed_user(&pool, "reviewer", Role::Reviewer).await;
    let activity = pending_activity(&pool, &organizer).await;

    review_service::decide(&pool, &reviewer, &activity, "approved", "", Utc::now())
        .await
        .expect("approve");
    let err = review_service::decide(&pool, &reviewer, &activity, "rejected", "", Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Rejected(Rejection::ReviewDecided)
    ));
}

#[tokio::test]
async fn unknown_decisions_are_rejected() {
    let pool = common::test_pool().await;
    let organizer = seed_user(&pool, "organizer", Role::Member).await;
    let reviewer = seed_user(&pool, "reviewer", Role::Reviewer).await;
    let activity = pending_activity(&pool, &organizer).await;

    let err = review_service::decide(&pool, &reviewer, &activity, "maybe", "", Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Rejected(Rejection::BadDecision)
    ));
}

#[tokio::test]
async fn queue_and_history_track_the_decision() {
    let pool = common::test_pool().await;
    let organizer = seed_user(&pool, "organizer", Role::Member).await;
    let reviewer = seed_user(&pool, "reviewer", Role::Reviewer).await;
    let decided = pending_activity(&pool, &organizer).await;
    let waiting = pending_activity(&pool, &organizer).await;

    assert_eq!(review_service::pending_queue(&pool).await.unwrap().len(), 2);

    review_service::decide(&pool, &reviewer, &decided, "approved", "", Utc::now())
        .await
        .expect("approve");

    let queue = review_service::pending_queue(&pool).await.unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id, waiting);

    let history = review_service::history(&pool, &reviewer).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, decided);
}
