use chrono::{DateTime, Utc};

/// One row of the activities table. `status` tracks the moderation
/// lifecycle (pending/active/rejected); the temporal state
/// (registering/ongoing/ended) is derived from the schedule on every read
/// and never stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivityRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub organizer_id: String,
    pub reviewer_id: Option<String>,
    pub venue_id: Option<String>,
    pub activity_type_id: Option<String>,
    pub max_participants: i64,
    pub current_participants: i64,
    pub tags: Option<String>,
    pub status: String,
    pub review_status: String,
    pub review_comment: Option<String>,
    pub review_time: Option<DateTime<Utc>>,
    pub is_approved: i64,
    pub poster_url: Option<String>,
    pub likes_count: i64,
    pub created_at: DateTime<Utc>,
}
