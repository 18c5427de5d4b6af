use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

const SQL_INSERT: &str = r#"
INSERT INTO comments (id, content, user_id, activity_id, created_at)
VALUES (?, ?, ?, ?, ?)
"#;

pub async fn insert_comment(
    pool: &SqlitePool,
    id: &str,
    content: &str,
    user_id: &str,
    activity_id: &str,
    created_at: DateTime<Utc>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT)
        .bind(id)
        .bind(content)
        .bind(user_id)
        .bind(activity_id)
        .bind(created_at)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentWithAuthorRow {
    pub id: String,
    pub content: String,
    pub user_id: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

const SQL_LIST_FOR_ACTIVITY: &str = r#"
SELECT c.id, c.content, c.user_id, u.username AS author_name, c.created_at
FROM comments c
JOIN users u ON u.id = c.user_id
WHERE c.activity_id = ?
ORDER BY datetime(c.created_at) DESC
"#;

pub async fn list_for_activity(
    pool: &SqlitePool,
    activity_id: &str,
) -> sqlx::Result<Vec<CommentWithAuthorRow>> {
    sqlx::query_as::<_, CommentWithAuthorRow>(SQL_LIST_FOR_ACTIVITY)
        .bind(activity_id)
        .fetch_all(pool)
        .await
}

const SQL_DELETE_FOR_ACTIVITY: &str = "DELETE FROM comments WHERE activity_id = ?";

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
