use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::models::ActivityRow;

const ACTIVITY_COLUMNS: &str = r#"
  id, title, description, start_time, end_time,
  organizer_id, reviewer_id, venue_id, activity_type_id,
  max_participants, current_participants, tags,
  status, review_status, review_comment, review_time,
  is_approved, poster_url, likes_count, created_at
"#;

pub async fn find_by_id<'e, E>(executor: E, activity_id: &str) -> sqlx::Result<Option<ActivityRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = ?");
    sqlx::query_as::<_, ActivityRow>(&sql)
        .bind(activity_id)
        .fetch_optional(executor)
        .await
}

pub struct NewActivity<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub organizer_id: &'a str,
    pub venue_id: Option<&'a str>,
    pub activity_type_id: Option<&'a str>,
    pub max_participants: i64,
    pub tags: Option<&'a str>,
    pub poster_url: Option<&'a str>,
    pub review_comment: &'a str,
    pub created_at: DateTime<Utc>,
}

const SQL_INSERT_ACTIVITY: &str = r#"
INSERT INTO activities (
  id, title, description, start_time, end_time,
  organizer_id, venue_id, activity_type_id,
  max_participants, current_participants, tags,
  status, review_status, review_comment, is_approved,
  poster_url, likes_count, created_at
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, 'pending', 'pending', ?, 0, ?, 0, ?)
"#;

pub async fn insert_activity(pool: &SqlitePool, activity: NewActivity<'_>) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_ACTIVITY)
        .bind(activity.id)
        .bind(activity.title)
        .bind(activity.description)
        .bind(activity.start_time)
        .bind(activity.end_time)
        .bind(activity.organizer_id)
        .bind(activity.venue_id)
        .bind(activity.activity_type_id)
        .bind(activity.max_participants)
        .bind(activity.tags)
        .bind(activity.review_comment)
        .bind(activity.poster_url)
        .bind(activity.created_at)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub struct ActivityChanges<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub venue_id: Option<&'a str>,
    pub activity_type_id: Option<&'a str>,
    pub max_participants: i64,
    pub tags: Option<&'a str>,
    pub poster_url: Option<&'a str>,
}

const SQL_UPDATE_ACTIVITY: &str = r#"
UPDATE activities SET
  title = ?, description = ?, start_time = ?, end_time = ?,
  venue_id = ?, activity_type_id = ?, max_participants = ?,
  tags = ?, poster_url = ?
WHERE id = ?
"#;

pub async fn update_activity(pool: &SqlitePool, changes: ActivityChanges<'_>) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_ACTIVITY)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.start_time)
        .bind(changes.end_time)
        .bind(changes.venue_id)
        .bind(changes.activity_type_id)
        .bind(changes.max_participants)
        .bind(changes.tags)
        .bind(changes.poster_url)
        .bind(changes.id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

// Half-open interval overlap: [s1,e1) and [s2,e2) collide iff
// s1 < e2 AND s2 < e1, so back-to-back bookings are allowed.
// The excluded id keeps an edit from conflicting with itself; creation
// passes an empty string, which matches no row.
const SQL_COUNT_VENUE_CONFLICTS: &str = r#"
SELECT COUNT(*)
FROM activities
WHERE venue_id = ?
  AND id != ?
  AND datetime(start_time) < datetime(?)
  AND datetime(end_time) > datetime(?)
"#;

pub async fn count_venue_conflicts(
    pool: &SqlitePool,
    venue_id: &str,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    exclude_id: &str,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT_VENUE_CONFLICTS)
        .bind(venue_id)
        .bind(exclude_id)
        .bind(end_time)
        .bind(start_time)
        .fetch_one(pool)
        .await
}

/// Listing-card row joined with venue/type/organizer names and the
/// viewer's join/like state. An empty viewer id matches no rows in the
/// EXISTS subqueries, so anonymous viewers get both flags as 0.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivityCardRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub tags: Option<String>,
    pub status: String,
    pub review_status: String,
    pub max_participants: i64,
    pub current_participants: i64,
    pub likes_count: i64,
    pub poster_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub venue_name: Option<String>,
    pub type_name: Option<String>,
    pub organizer_name: String,
    pub is_joined: i64,
    pub is_liked: i64,
    pub comment_count: i64,
}

/// Optional listing filters. Empty string disables a clause; the SQL uses
/// `? = '' OR ...` guards so one static statement serves every combination.
#[derive(Debug, Default, Clone)]
pub struct ActivityFilters {
    pub search: String,
    pub search_like: String,
    pub type_id: String,
    pub venue_id: String,
    pub date_from: String,
    pub date_to: String,
    pub phase: String,
    pub now: String,
}

const CARD_SELECT: &str = r#"
SELECT
  a.id, a.title, a.description, a.start_time, a.end_time,
  a.tags, a.status, a.review_status,
  a.max_participants, a.current_participants, a.likes_count,
  a.poster_url, a.created_at,
  v.name AS venue_name,
  t.name AS type_name,
  u.username AS organizer_name,
  EXISTS(SELECT 1 FROM participations p WHERE p.user_id = ?1 AND p.activity_id = a.id) AS is_joined,
  EXISTS(SELECT 1 FROM likes l WHERE l.user_id = ?1 AND l.activity_id = a.id) AS is_liked,
  (SELECT COUNT(*) FROM comments c WHERE c.activity_id = a.id) AS comment_count
FROM activities a
LEFT JOIN venues v ON v.id = a.venue_id
LEFT JOIN activity_types t ON t.id = a.activity_type_id
JOIN users u ON u.id = a.organizer_id
"#;

const FILTER_CLAUSES: &str = r#"
  AND (?2 = '' OR lower(a.title) LIKE ?3)
  AND (?4 = '' OR a.activity_type_id = ?4)
  AND (?5 = '' OR a.venue_id = ?5)
  AND (?6 = '' OR datetime(a.start_time) >= datetime(?6))
  AND (?7 = '' OR datetime(a.end_time) < datetime(?7))
  AND (?8 = ''
    OR (?8 = 'upcoming' AND datetime(a.start_time) > datetime(?9))
    OR (?8 = 'ongoing' AND datetime(a.start_time) <= datetime(?9) AND datetime(a.end_time) >= datetime(?9))
    OR (?8 = 'ended' AND datetime(a.end_time) < datetime(?9)))
"#;

fn public_cards_sql(hot: bool) -> String {
    let order = if hot {
        "ORDER BY a.current_participants DESC, datetime(a.created_at) DESC"
    } else {
        "ORDER BY datetime(a.start_time) DESC"
    };
    format!(
        "{CARD_SELECT} WHERE a.status = 'active' AND a.is_approved = 1 {FILTER_CLAUSES} {order} LIMIT ?10 OFFSET ?11"
    )
}

pub async fn list_public_cards(
    pool: &SqlitePool,
    viewer_id: &str,
    filters: &ActivityFilters,
    hot: bool,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<ActivityCardRow>> {
    let sql = public_cards_sql(hot);
    sqlx::query_as::<_, ActivityCardRow>(&sql)
        .bind(viewer_id)
        .bind(&filters.search)
        .bind(&filters.search_like)
        .bind(&filters.type_id)
        .bind(&filters.venue_id)
        .bind(&filters.date_from)
        .bind(&filters.date_to)
        .bind(&filters.phase)
        .bind(&filters.now)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

const SQL_COUNT_PUBLIC: &str = r#"
SELECT COUNT(*)
FROM activities a
WHERE a.status = 'active' AND a.is_approved = 1
  AND (?1 = '' OR lower(a.title) LIKE ?2)
  AND (?3 = '' OR a.activity_type_id = ?3)
  AND (?4 = '' OR a.venue_id = ?4)
  AND (?5 = '' OR datetime(a.start_time) >= datetime(?5))
  AND (?6 = '' OR datetime(a.end_time) < datetime(?6))
  AND (?7 = ''
    OR (?7 = 'upcoming' AND datetime(a.start_time) > datetime(?8))
    OR (?7 = 'ongoing' AND datetime(a.start_time) <= datetime(?8) AND datetime(a.end_time) >= datetime(?8))
    OR (?7 = 'ended' AND datetime(a.end_time) < datetime(?8)))
"#;

pub async fn count_public(pool: &SqlitePool, filters: &ActivityFilters) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT_PUBLIC)
        .bind(&filters.search)
        .bind(&filters.search_like)
        .bind(&filters.type_id)
        .bind(&filters.venue_id)
        .bind(&filters.date_from)
        .bind(&filters.date_to)
        .bind(&filters.phase)
        .bind(&filters.now)
        .fetch_one(pool)
        .await
}

/// Approved, active, future-starting activities with their comment counts;
/// the candidate set for hot scoring and recommendations.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UpcomingActivityRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub venue_name: Option<String>,
    pub type_name: Option<String>,
    pub activity_type_id: Option<String>,
    pub tags: Option<String>,
    pub poster_url: Option<String>,
    pub likes_count: i64,
    pub current_participants: i64,
    pub max_participants: i64,
    pub organizer_name: String,
    pub is_joined: i64,
    pub is_liked: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
}

const UPCOMING_SELECT: &str = r#"
SELECT
  a.id, a.title, a.description, a.start_time, a.end_time,
  v.name AS venue_name,
  t.name AS type_name,
  a.activity_type_id, a.tags, a.poster_url,
  a.likes_count, a.current_participants, a.max_participants,
  u.username AS organizer_name,
  EXISTS(SELECT 1 FROM participations p WHERE p.user_id = ?2 AND p.activity_id = a.id) AS is_joined,
  EXISTS(SELECT 1 FROM likes l WHERE l.user_id = ?2 AND l.activity_id = a.id) AS is_liked,
  (SELECT COUNT(*) FROM comments c WHERE c.activity_id = a.id) AS comment_count,
  a.created_at
FROM activities a
LEFT JOIN venues v ON v.id = a.venue_id
LEFT JOIN activity_types t ON t.id = a.activity_type_id
JOIN users u ON u.id = a.organizer_id
WHERE a.status = 'active' AND a.is_approved = 1
  AND datetime(a.start_time) > datetime(?1)
"#;

pub async fn list_upcoming_approved(
    pool: &SqlitePool,
    now: DateTime<Utc>,
    viewer_id: &str,
) -> sqlx::Result<Vec<UpcomingActivityRow>> {
    let sql = format!("{UPCOMING_SELECT} ORDER BY datetime(a.created_at) DESC");
    sqlx::query_as::<_, UpcomingActivityRow>(&sql)
        .bind(now)
        .bind(viewer_id)
        .fetch_all(pool)
        .await
}

pub async fn list_upcoming_not_joined(
    pool: &SqlitePool,
    now: DateTime<Utc>,
    user_id: &str,
) -> sqlx::Result<Vec<UpcomingActivityRow>> {
    let sql = format!(
        "{UPCOMING_SELECT}
  AND NOT EXISTS(SELECT 1 FROM participations p WHERE p.user_id = ?2 AND p.activity_id = a.id)
ORDER BY datetime(a.created_at) DESC"
    );
    sqlx::query_as::<_, UpcomingActivityRow>(&sql)
        .bind(now)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

/// Activities the user has joined, for the recommendation history harvest.
const SQL_LIST_JOINED: &str = r#"
SELECT
  a.id, a.title, a.description, a.start_time, a.end_time,
  a.organizer_id, a.reviewer_id, a.venue_id, a.activity_type_id,
  a.max_participants, a.current_participants, a.tags,
  a.status, a.review_status, a.review_comment, a.review_time,
  a.is_approved, a.poster_url, a.likes_count, a.created_at
FROM activities a
JOIN participations p ON p.activity_id = a.id
WHERE p.user_id = ?
"#;

pub async fn list_joined_activities(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Vec<ActivityRow>> {
    sqlx::query_as::<_, ActivityRow>(SQL_LIST_JOINED)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

fn organized_cards_sql() -> String {
    format!(
        "{CARD_SELECT} WHERE a.organizer_id = ?1 {FILTER_CLAUSES} ORDER BY datetime(a.start_time) DESC"
    )
}

/// Everything the user organized, all moderation states included.
/// The viewer and the organizer are the same user here, so ?1 doubles as
/// the flag probe in the EXISTS subqueries.
pub async fn list_organized_cards(
    pool: &SqlitePool,
    organizer_id: &str,
    filters: &ActivityFilters,
) -> sqlx::Result<Vec<ActivityCardRow>> {
    let sql = organized_cards_sql();
    sqlx::query_as::<_, ActivityCardRow>(&sql)
        .bind(organizer_id)
        .bind(&filters.search)
        .bind(&filters.search_like)
        .bind(&filters.type_id)
        .bind(&filters.venue_id)
        .bind(&filters.date_from)
        .bind(&filters.date_to)
        .bind(&filters.phase)
        .bind(&filters.now)
        .fetch_all(pool)
        .await
}

fn participated_cards_sql() -> String {
    format!(
        "{CARD_SELECT}
JOIN participations mine ON mine.activity_id = a.id AND mine.user_id = ?1
WHERE a.organizer_id != ?1
  AND datetime(a.end_time) >= datetime(?9, '-7 days')
  {FILTER_CLAUSES}
ORDER BY datetime(a.start_time) DESC"
    )
}

/// Activities the user joined but did not organize, hiding anything that
/// ended more than a week ago.
pub async fn list_participated_cards(
    pool: &SqlitePool,
    user_id: &str,
    filters: &ActivityFilters,
) -> sqlx::Result<Vec<ActivityCardRow>> {
    let sql = participated_cards_sql();
    sqlx::query_as::<_, ActivityCardRow>(&sql)
        .bind(user_id)
        .bind(&filters.search)
        .bind(&filters.search_like)
        .bind(&filters.type_id)
        .bind(&filters.venue_id)
        .bind(&filters.date_from)
        .bind(&filters.date_to)
        .bind(&filters.phase)
        .bind(&filters.now)
        .fetch_all(pool)
        .await
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewQueueRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_participants: i64,
    pub tags: Option<String>,
    pub review_status: String,
    pub review_comment: Option<String>,
    pub review_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub organizer_name: String,
    pub venue_name: Option<String>,
    pub type_name: Option<String>,
}

const REVIEW_QUEUE_SELECT: &str = r#"
SELECT
  a.id, a.title, a.description, a.start_time, a.end_time,
  a.max_participants, a.tags,
  a.review_status, a.review_comment, a.review_time, a.created_at,
  u.username AS organizer_name,
  v.name AS venue_name,
  t.name AS type_name
FROM activities a
JOIN users u ON u.id = a.organizer_id
LEFT JOIN venues v ON v.id = a.venue_id
LEFT JOIN activity_types t ON t.id = a.activity_type_id
"#;

pub async fn list_pending_review(pool: &SqlitePool) -> sqlx::Result<Vec<ReviewQueueRow>> {
    let sql = format!(
        "{REVIEW_QUEUE_SELECT} WHERE a.review_status = 'pending' ORDER BY datetime(a.created_at) ASC"
    );
    sqlx::query_as::<_, ReviewQueueRow>(&sql).fetch_all(pool).await
}

pub async fn list_reviewed_by(
    pool: &SqlitePool,
    reviewer_id: &str,
) -> sqlx::Result<Vec<ReviewQueueRow>> {
    let sql = format!(
        "{REVIEW_QUEUE_SELECT}
WHERE a.reviewer_id = ? AND a.review_status != 'pending'
ORDER BY datetime(a.review_time) DESC"
    );
    sqlx::query_as::<_, ReviewQueueRow>(&sql)
        .bind(reviewer_id)
        .fetch_all(pool)
        .await
}

const SQL_UPDATE_REVIEW: &str = r#"
UPDATE activities SET
  review_status = ?, status = ?, is_approved = ?,
  review_comment = ?, review_time = ?, reviewer_id = ?
WHERE id = ?
"#;

pub struct ReviewDecision<'a> {
    pub activity_id: &'a str,
    pub review_status: &'a str,
    pub status: &'a str,
    pub is_approved: bool,
    pub review_comment: Option<&'a str>,
    pub review_time: DateTime<Utc>,
    pub reviewer_id: &'a str,
}

pub async fn apply_review<'e, E>(executor: E, decision: ReviewDecision<'_>) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_UPDATE_REVIEW)
        .bind(decision.review_status)
        .bind(decision.status)
        .bind(decision.is_approved as i64)
        .bind(decision.review_comment)
        .bind(decision.review_time)
        .bind(decision.reviewer_id)
        .bind(decision.activity_id)
        .execute(executor)
        .await?;
    Ok(res.rows_affected())
}

const SQL_INCREMENT_PARTICIPANTS: &str = r#"
UPDATE activities SET current_participants = current_participants + 1 WHERE id = ?
"#;

pub async fn increment_participants<'e, E>(executor: E, activity_id: &str) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_INCREMENT_PARTICIPANTS)
        .bind(activity_id)
        .execute(executor)
        .await?;
    Ok(res.rows_affected())
}

const SQL_DECREMENT_PARTICIPANTS: &str = r#"
UPDATE activities
SET current_participants = MAX(current_participants - 1, 0)
WHERE id = ?
"#;

pub async fn decrement_participants<'e, E>(executor: E, activity_id: &str) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_DECREMENT_PARTICIPANTS)
        .bind(activity_id)
        .execute(executor)
        .await?;
    Ok(res.rows_affected())
}

const SQL_ADJUST_LIKES: &str = r#"
UPDATE activities
SET likes_count = MAX(likes_count + ?, 0)
WHERE id = ?
"#;

pub async fn adjust_likes<'e, E>(executor: E, activity_id: &str, delta: i64) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_ADJUST_LIKES)
        .bind(delta)
        .bind(activity_id)
        .execute(executor)
        .await?;
    Ok(res.rows_affected())
}

const SQL_CURRENT_LIKES: &str = "SELECT likes_count FROM activities WHERE id = ?";

pub async fn current_likes<'e, E>(executor: E, activity_id: &str) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar::<_, i64>(SQL_CURRENT_LIKES)
        .bind(activity_id)
        .fetch_one(executor)
        .await
}

const SQL_DELETE_ACTIVITY: &str = "DELETE FROM activities WHERE id = ?";

pub async fn delete_activity<'e, E>(executor: E, activity_id: &str) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_DELETE_ACTIVITY)
        .bind(activity_id)
        .execute(executor)
        .await?;
    Ok(res.rows_affected())
}

const SQL_VENUE_IN_USE: &str =
    "SELECT EXISTS(SELECT 1 FROM activities WHERE venue_id = ?)";

pub async fn venue_in_use(pool: &SqlitePool, venue_id: &str) -> sqlx::Result<bool> {
    let used: i64 = sqlx::query_scalar(SQL_VENUE_IN_USE)
        .bind(venue_id)
        .fetch_one(pool)
        .await?;
    Ok(used != 0)
}

const SQL_TYPE_IN_USE: &str =
    "SELECT EXISTS(SELECT 1 FROM activities WHERE activity_type_id = ?)";

pub async fn type_in_use(pool: &SqlitePool, type_id: &str) -> sqlx::Result<bool> {
    let used: i64 = sqlx::query_scalar(SQL_TYPE_IN_USE)
        .bind(type_id)
        .fetch_one(pool)
        .await?;
    Ok(used != 0)
}

const SQL_COUNT_ALL: &str = "SELECT COUNT(*) FROM activities";

pub async fn count_all(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT_ALL).fetch_one(pool).await
}

const SQL_COUNT_PENDING_REVIEW: &str =
    "SELECT COUNT(*) FROM activities WHERE review_status = 'pending'";

pub async fn count_pending_review(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT_PENDING_REVIEW)
        .fetch_one(pool)
        .await
}
