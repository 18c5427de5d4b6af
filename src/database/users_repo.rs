use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::{Role, UserRow};

const SQL_FIND_BY_ID: &str = r#"
SELECT id, username, email, password_hash, role, department, interests, created_at
FROM users
WHERE id = ?
"#;

pub async fn find_by_id(pool: &SqlitePool, user_id: &str) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(SQL_FIND_BY_ID)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

const SQL_FIND_BY_USERNAME: &str = r#"
SELECT id, username, email, password_hash, role, department, interests, created_at
FROM users
WHERE username = ?
"#;

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(SQL_FIND_BY_USERNAME)
        .bind(username)
        .fetch_optional(pool)
        .await
}

const SQL_FIND_BY_EMAIL: &str = r#"
SELECT id, username, email, password_hash, role, department, interests, created_at
FROM users
WHERE email = ?
"#;

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(SQL_FIND_BY_EMAIL)
        .bind(email)
        .fetch_optional(pool)
        .await
}

const SQL_INSERT_USER: &str = r#"
INSERT INTO users (id, username, email, password_hash, role, department, interests, created_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub struct NewUser<'a> {
    pub id: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
    pub department: Option<&'a str>,
    pub interests: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

pub async fn insert_user(pool: &SqlitePool, user: NewUser<'_>) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_USER)
        .bind(user.id)
        .bind(user.username)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.role)
        .bind(user.department)
        .bind(user.interests)
        .bind(user.created_at)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_LIST: &str = r#"
SELECT id, username, email, password_hash, role, department, interests, created_at
FROM users
WHERE (? = '' OR lower(username) LIKE ?)
ORDER BY username ASC
"#;

pub async fn list(pool: &SqlitePool, search: &str) -> sqlx::Result<Vec<UserRow>> {
    let like = format!("%{}%", search.to_lowercase());
    sqlx::query_as::<_, UserRow>(SQL_LIST)
        .bind(search)
        .bind(&like)
        .fetch_all(pool)
        .await
}

const SQL_UPDATE_ROLE: &str = r#"
UPDATE users SET role = ? WHERE id = ?
"#;

pub async fn update_role(pool: &SqlitePool, user_id: &str, role: Role) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_ROLE)
        .bind(role)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_COUNT: &str = "SELECT COUNT(*) FROM users";

pub async fn count(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT).fetch_one(pool).await
}
