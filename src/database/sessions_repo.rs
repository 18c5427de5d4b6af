use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::UserRow;

const SQL_INSERT_SESSION: &str = r#"
INSERT INTO sessions (token, user_id, created_at) VALUES (?, ?, ?)
"#;

pub async fn insert_session(
    pool: &SqlitePool,
    token: &str,
    user_id: &str,
    created_at: DateTime<Utc>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_SESSION)
        .bind(token)
        .bind(user_id)
        .bind(created_at)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_FIND_USER_BY_TOKEN: &str = r#"
SELECT u.id, u.username, u.email, u.password_hash, u.role, u.department, u.interests, u.created_at
FROM sessions s
JOIN users u ON u.id = s.user_id
WHERE s.token = ?
"#;

pub async fn find_user_by_token(pool: &SqlitePool, token: &str) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(SQL_FIND_USER_BY_TOKEN)
        .bind(token)
        .fetch_optional(pool)
        .await
}

const SQL_DELETE_SESSION: &str = "DELETE FROM sessions WHERE token = ?";

pub async fn delete_session(pool: &SqlitePool, token: &str) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_SESSION)
        .bind(token)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
