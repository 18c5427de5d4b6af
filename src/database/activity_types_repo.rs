use sqlx::SqlitePool;

use crate::models::ActivityTypeRow;

const SQL_LIST_ALL: &str = r#"
SELECT id, name, description FROM activity_types ORDER BY name ASC
"#;

pub async fn list_all(pool: &SqlitePool) -> sqlx::Result<Vec<ActivityTypeRow>> {
    sqlx::query_as::<_, ActivityTypeRow>(SQL_LIST_ALL)
        .fetch_all(pool)
        .await
}

const SQL_FIND_BY_ID: &str = r#"
SELECT id, name, description FROM activity_types WHERE id = ?
"#;

pub async fn find_by_id(pool: &SqlitePool, type_id: &str) -> sqlx::Result<Option<ActivityTypeRow>> {
    sqlx::query_as::<_, ActivityTypeRow>(SQL_FIND_BY_ID)
        .bind(type_id)
        .fetch_optional(pool)
        .await
}

const SQL_INSERT: &str = r#"
INSERT INTO activity_types (id, name, description) VALUES (?, ?, ?)
"#;

pub async fn insert_type(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    description: Option<&str>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT)
        .bind(id)
        .bind(name)
        .bind(description)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_UPDATE: &str = r#"
UPDATE activity_types SET name = ?, description = ? WHERE id = ?
"#;

pub async fn update_type(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    description: Option<&str>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE)
        .bind(name)
        .bind(description)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_DELETE: &str = "DELETE FROM activity_types WHERE id = ?";

pub async fn delete_type(pool: &SqlitePool, id: &str) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE).bind(id).execute(pool).await?;
    Ok(res.rows_affected())
}

const SQL_COUNT: &str = "SELECT COUNT(*) FROM activity_types";

pub async fn count(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT).fetch_one(pool).await
}
