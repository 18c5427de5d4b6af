use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::models::NotificationRow;

const SQL_INSERT: &str = r#"
INSERT INTO notifications (id, user_id, activity_id, body, created_at)
VALUES (?, ?, ?, ?, ?)
"#;

pub async fn insert_notification<'e, E>(
    executor: E,
    id: &str,
    user_id: &str,
    activity_id: Option<&str>,
    body: &str,
    created_at: DateTime<Utc>,
) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_INSERT)
        .bind(id)
        .bind(user_id)
        .bind(activity_id)
        .bind(body)
        .bind(created_at)
        .execute(executor)
        .await?;
    Ok(res.rows_affected())
}

const SQL_LIST_FOR_USER: &str = r#"
SELECT id, user_id, activity_id, body, created_at, read_at
FROM notifications
WHERE user_id = ?
ORDER BY datetime(created_at) DESC
LIMIT ?
"#;

pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: &str,
    limit: i64,
) -> sqlx::Result<Vec<NotificationRow>> {
    sqlx::query_as::<_, NotificationRow>(SQL_LIST_FOR_USER)
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
}

const SQL_MARK_ALL_READ: &str = r#"
UPDATE notifications SET read_at = ? WHERE user_id = ? AND read_at IS NULL
"#;

pub async fn mark_all_read(
    pool: &SqlitePool,
    user_id: &str,
    read_at: DateTime<Utc>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_MARK_ALL_READ)
        .bind(read_at)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_DELETE_FOR_ACTIVITY: &str = "DELETE FROM notifications WHERE activity_id = ?";

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
