#![allow(dead_code)]

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use campus_activities::database::activities_repo::{self, NewActivity};
use campus_activities::database::users_repo::{self, NewUser};
use campus_activities::database::{activity_types_repo, venues_repo};
use campus_activities::models::Role;

/// One shared in-memory database per test; a single connection keeps every
/// query on the same memory store.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    sqlx::migrate!().run(&pool).await.expect("migrations");
    pool
}

pub async fn seed_user(pool: &SqlitePool, username: &str, role: Role) -> String {
    let id = Uuid::new_v4().to_string();
    users_repo::insert_user(
        pool,
        NewUser {
            id: &id,
            username,
            email: &format!("{username}@campus.edu"),
            password_hash: "x",
            role,
            department: Some("Engineering"),
            interests: None,
            created_at: Utc::now(),
        },
    )
    .await
    .expect("seed user");
    id
}

pub async fn seed_venue(pool: &SqlitePool, name: &str, capacity: i64) -> String {
    let id = Uuid::new_v4().to_string();
    venues_repo::insert_venue(pool, &id, name, "1 Campus Way", capacity)
        .await
        .expect("seed venue");
    id
}

pub async fn seed_type(pool: &SqlitePool, name: &str) -> String {
    let id = Uuid::new_v4().to_string();
    activity_types_repo::insert_type(pool, &id, name, None)
        .await
        .expect("seed type");
    id
}

pub struct ActivitySeed<'a> {
    pub organizer_id: &'a str,
    pub venue_id: Option<&'a str>,
    pub type_id: Option<&'a str>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_participants: i64,
    pub tags: Option<&'a str>,
}

pub async fn seed_activity(pool: &SqlitePool, seed: ActivitySeed<'_>) -> String {
    let id = Uuid::new_v4().to_string();
    activities_repo::insert_activity(
        pool,
        NewActivity {
            id: &id,
            title: "Seeded activity",
            description: "seeded",
            start_time: seed.start_time,
            end_time: seed.end_time,
            organizer_id: seed.organizer_id,
            venue_id: seed.venue_id,
            activity_type_id: seed.type_id,
            max_participants: seed.max_participants,
            tags: seed.tags,
            poster_url: None,
            review_comment: "Awaiting reviewer decision",
            created_at: Utc::now(),
        },
    )
    .await
    .expect("seed activity");
    id
}

pub async fn approve_activity(pool: &SqlitePool, activity_id: &str) {
    sqlx::query(
        "UPDATE activities SET status = 'active', review_status = 'approved', is_approved = 1 WHERE id = ?",
    )
    .bind(activity_id)
    .execute(pool)
    .await
    .expect("approve activity");
}

pub async fn set_likes(pool: &SqlitePool, activity_id: &str, likes: i64) {
    sqlx::query("UPDATE activities SET likes_count = ? WHERE id = ?")
        .bind(likes)
        .bind(activity_id)
        .execute(pool)
        .await
        .expect("set likes");
}
