use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

const SQL_INSERT: &str = r#"
INSERT INTO likes (id, user_id, activity_id, created_at) VALUES (?, ?, ?, ?)
"#;

pub async fn insert_like<'e, E>(
    executor: E,
    id: &str,
    user_id: &str,
    activity_id: &str,
    created_at: DateTime<Utc>,
) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_INSERT)
        .bind(id)
        .bind(user_id)
        .bind(activity_id)
        .bind(created_at)
        .execute(executor)
        .await?;
    Ok(res.rows_affected())
}

const SQL_DELETE: &str = r#"
DELETE FROM likes WHERE user_id = ? AND activity_id = ?
"#;

pub async fn delete_like<'e, E>(
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
SELECT EXISTS(SELECT 1 FROM likes WHERE user_id = ? AND activity_id = ?)
"#;

pub async fn exists(pool: &SqlitePool, user_id: &str, activity_id: &str) -> sqlx::Result<bool> {
    let found: i64 = sqlx::query_scalar(SQL_EXISTS)
        .bind(user_id)
        .bind(activity_id)
        .fetch_one(pool)
        .await?;
    Ok(found != 0)
}

const SQL_DELETE_FOR_ACTIVITY: &str = "DELETE FROM likes WHERE activity_id = ?";

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
