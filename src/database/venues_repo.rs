use sqlx::SqlitePool;

use crate::models::VenueRow;

const SQL_LIST_ALL: &str = r#"
SELECT id, name, address, capacity FROM venues ORDER BY name ASC
"#;

pub async fn list_all(pool: &SqlitePool) -> sqlx::Result<Vec<VenueRow>> {
    sqlx::query_as::<_, VenueRow>(SQL_LIST_ALL).fetch_all(pool).await
}

const SQL_FIND_BY_ID: &str = r#"
SELECT id, name, address, capacity FROM venues WHERE id = ?
"#;

pub async fn find_by_id(pool: &SqlitePool, venue_id: &str) -> sqlx::Result<Option<VenueRow>> {
    sqlx::query_as::<_, VenueRow>(SQL_FIND_BY_ID)
        .bind(venue_id)
        .fetch_optional(pool)
        .await
}

const SQL_INSERT: &str = r#"
INSERT INTO venues (id, name, address, capacity) VALUES (?, ?, ?, ?)
"#;

pub async fn insert_venue(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    address: &str,
    capacity: i64,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT)
        .bind(id)
        .bind(name)
        .bind(address)
        .bind(capacity)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_UPDATE: &str = r#"
UPDATE venues SET name = ?, address = ?, capacity = ? WHERE id = ?
"#;

pub async fn update_venue(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    address: &str,
    capacity: i64,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE)
        .bind(name)
        .bind(address)
        .bind(capacity)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_DELETE: &str = "DELETE FROM venues WHERE id = ?";

pub async fn delete_venue(pool: &SqlitePool, id: &str) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE).bind(id).execute(pool).await?;
    Ok(res.rows_affected())
}

const SQL_COUNT: &str = "SELECT COUNT(*) FROM venues";

pub async fn count(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT).fetch_one(pool).await
}
