use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

const SQL_INSERT: &str = r#"
INSERT INTO participations (id, user_id, activity_id, status, registered_at)
VALUES (?, ?, ?, 'registered', ?)
"#;

/// The UNIQUE(user_id, activity_id) index makes a duplicate insert fail
/// with a constraint violation; callers translate that into the
/// already-joined rejection.
pub async fn insert_participation<'e, E>(
    executor: E,
    id: &str,
    user_id: &str,
    activity_id: &str,
    registered_at: DateTime<Utc>,
) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_INSERT)
        .bind(id)
        .bind(user_id)
        .bind(activity_id)
        .bind(registered_at)
        .execute(executor)
        .await?;
    Ok(res.rows_affected())
}

const SQL_DELETE: &str = r#"
DELETE FROM participations WHERE user_id = ? AND activity_id = ?
"#;

pub async fn delete_participation<'e, E>(
    executor: E,
    user_id: &str,
    activity_id: &str,
) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_DELETE)
        .bind(user_id)
        .bind(activity_id)
        .execute(executor)
        .await?;
    Ok(res.rows_affected())
}

const SQL_EXISTS: &str = r#"
SELECT EXISTS(SELECT 1 FROM participations WHERE user_id = ? AND activity_id = ?)
"#;

pub async fn exists<'e, E>(executor: E, user_id: &str, activity_id: &str) -> sqlx::Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let found: i64 = sqlx::query_scalar(SQL_EXISTS)
        .bind(user_id)
        .bind(activity_id)
        .fetch_one(executor)
        .await?;
    Ok(found != 0)
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ParticipantRow {
    pub user_id: String,
    pub username: String,
    pub status: String,
    pub registered_at: DateTime<Utc>,
}

const SQL_LIST_FOR_ACTIVITY: &str = r#"
SELECT p.user_id, u.username, p.status, p.registered_at
FROM participations p
JOIN users u ON u.id = p.user_id
WHERE p.activity_id = ?
ORDER BY datetime(p.registered_at) ASC
"#;

pub async fn list_for_activity(
    pool: &SqlitePool,
    activity_id: &str,
) -> sqlx::Result<Vec<ParticipantRow>> {
    sqlx::query_as::<_, ParticipantRow>(SQL_LIST_FOR_ACTIVITY)
        .bind(activity_id)
        .fetch_all(pool)
        .await
}

const SQL_DELETE_FOR_ACTIVITY: &str = "DELETE FROM participations WHERE activity_id = ?";

pub async fn delete_for_activity<'e, E>(executor: E, activity_id: &str) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_DELETE_FOR_ACTIVITY)
        .bind(activity_id)
        .execute(executor)
        .await?;
    Ok(res.rows_affected())
}
