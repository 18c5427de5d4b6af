mod common;

use campus_activities::database::participations_repo;
use campus_activities::models::Role;
use campus_activities::services::recommendation_service;
use chrono::{Duration, Utc};
use common::{approve_activity, seed_activity, seed_type, seed_user, set_likes, ActivitySeed};
use uuid::Uuid;

async fn join(pool: &sqlx::SqlitePool, user: &str, activity: &str) {
    let id = Uuid::new_v4().to_string();
    participations_repo::insert_participation(pool, &id, user, activity, Utc::now())
        .await
        .expect("join");
}

async fn approved_future(
    pool: &sqlx::SqlitePool,
    organizer: &str,
    type_id: Option<&str>,
    tags: Option<&str>,
) -> String {
    let start = Utc::now() + Duration::days(2);
    let id = seed_activity(
        pool,
        ActivitySeed {
            organizer_id: organizer,
            venue_id: None,
            type_id,
            start_time: start,
            end_time: start + Duration::hours(2),
            max_participants: 30,
            tags,
        },
    )
    .await;
    approve_activity(pool, &id).await;
    id
}

#[tokio::test]
async fn history_drives_type_and_tag_recommendations() {
    let pool = common::test_pool().await;
    let organizer = seed_user(&pool, "organizer", Role::Member).await;
    let member = seed_user(&pool, "member", Role::Member).await;
    let music = seed_type(&pool, "Music").await;
    let sports = seed_type(&pool, "Sports").await;

    // the member once joined a music activity tagged "concert"
    let past_start = Utc::now() - Duration::days(30);
    let past = seed_activity(
        &pool,
        ActivitySeed {
            organizer_id: &organizer,
            venue_id: None,
            type_id: Some(&music),
            start_time: past_start,
            end_time: past_start + Duration::hours(2),
            max_participants: 30,
            tags: Some("concert, evening"),
        },
    )
    .await;
    approve_activity(&pool, &past).await;
    join(&pool, &member, &past).await;

    let same_type = approved_future(&pool, &organizer, Some(&music), None).await;
    let tag_match = approved_future(&pool, &organizer, Some(&sports), Some("Concert warm-up")).await;
    let unrelated = approved_future(&pool, &organizer, Some(&sports), Some("chess")).await;

    let picks = recommendation_service::recommend(&pool, Some(member.as_str()), Utc::now())
        .await
        .expect("recommend");
    let ids: Vec<&str> = picks.iter().map(|p| p.id.as_str()).collect();

    assert!(ids.contains(&same_type.as_str()));
    assert!(ids.contains(&tag_match.as_str()));
    assert!(!ids.contains(&unrelated.as_str()));
    // the type match outranks the tag match
    assert_eq!(ids[0], same_type.as_str());
}

#[tokio::test]
async fn already_joined_activities_are_never_recommended() {
    let pool = common::test_pool().await;
    let organizer = seed_user(&pool, "organizer", Role::Member).await;
    let member = seed_user(&pool, "member", Role::Member).await;
    let music = seed_type(&pool, "Music").await;

    let history = approved_future(&pool, &organizer, Some(&music), None).await;
    join(&pool, &member, &history).await;
    let fresh = approved_future(&pool, &organizer, Some(&music), None).await;

    let picks = recommendation_service::recommend(&pool, Some(member.as_str()), Utc::now())
        .await
        .expect("recommend");
    let ids: Vec<&str> = picks.iter().map(|p| p.id.as_str()).collect();
    assert!(ids.contains(&fresh.as_str()));
    assert!(!ids.contains(&history.as_str()));
}

#[tokio::test]
async fn cold_start_falls_back_to_the_hot_ranking() {
    let pool = common::test_pool().await;
    let organizer = seed_user(&pool, "organizer", Role::Member).await;
    let newcomer = seed_user(&pool, "newcomer", Role::Member).await;
    let music = seed_type(&pool, "Music").await;

    let quiet = approved_future(&pool, &organizer, Some(&music), None).await;
    let popular = approved_future(&pool, &organizer, Some(&music), None).await;
    set_likes(&pool, &popular, 50).await;

    let picks = recommendation_service::recommend(&pool, Some(newcomer.as_str()), Utc::now())
        .await
        .expect("recommend");
    assert_eq!(picks[0].id, popular);
    assert!(picks.iter().any(|p| p.id == quiet));
}

#[tokio::test]
async fn anonymous_visitors_get_the_hot_ranking() {
    let pool = common::test_pool().await;
    let organizer = seed_user(&pool, "organizer", Role::Member).await;
    let music = seed_type(&pool, "Music").await;

    let popular = approved_future(&pool, &organizer, Some(&music), None).await;
    set_likes(&pool, &popular, 10).await;

    let picks = recommendation_service::recommend(&pool, None, Utc::now())
        .await
        .expect("recommend");
    assert_eq!(picks.len(), 1);
    assert_eq!(picks[0].id, popular);
}

#[tokio::test]
async fn pending_activities_are_not_recommended() {
    let pool = common::test_pool().await;
    let organizer = seed_user(&pool, "organizer", Role::Member).await;
    let music = seed_type(&pool, "Music").await;

    // never approved
    let start = Utc::now() + Duration::days(2);
    seed_activity(
        &pool,
        ActivitySeed {
            organizer_id: &organizer,
            venue_id: None,
            type_id: Some(&music),
            start_time: start,
            end_time: start + Duration::hours(2),
            max_participants: 30,
            tags: None,
        },
    )
    .await;

    let picks = recommendation_service::recommend(&pool, None, Utc::now())
        .await
        .expect("recommend");
    assert!(picks.is_empty());
}
