use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::users_repo::{self, NewUser};
use crate::database::sessions_repo;
use crate::error::{is_unique_violation, Rejection, ServiceError, ServiceResult};
use crate::models::{Role, UserRow};

const USERNAME_MIN: usize = 4;
const USERNAME_MAX: usize = 20;
const PASSWORD_MIN: usize = 6;

#[derive(Debug, Deserialize, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub department: String,
    #[serde(default)]
    pub interests: String,
}

fn validate_registration(form: &RegisterForm) -> Result<(), Rejection> {
    let username = form.username.trim();
    if username.chars().count() < USERNAME_MIN || username.chars().count() > USERNAME_MAX {
        return Err(Rejection::UsernameLength);
    }
    let email = form.email.trim();
    if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(Rejection::InvalidEmail);
    }
    if form.password.chars().count() < PASSWORD_MIN {
        return Err(Rejection::PasswordLength);
    }
    if form.password != form.password_confirm {
        return Err(Rejection::PasswordMismatch);
    }
    if form.department.trim().is_empty() {
        return Err(Rejection::DepartmentRequired);
    }
    Ok(())
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Creates a member account. Usernames and emails are unique; the schema
/// constraint backs up the pre-checks.
pub async fn register(
    pool: &SqlitePool,
    form: &RegisterForm,
    now: DateTime<Utc>,
) -> ServiceResult<String> {
    validate_registration(form).map_err(ServiceError::Rejected)?;

    let username = form.username.trim();
    let email = form.email.trim();
    if users_repo::find_by_username(pool, username).await?.is_some() {
        return Err(Rejection::UsernameTaken.into());
    }
    if users_repo::find_by_email(pool, email).await?.is_some() {
        return Err(Rejection::EmailTaken.into());
    }

    let password_hash = hash_password(&form.password)?;
    let id = Uuid::new_v4().to_string();
    let interests = form.interests.trim();
    let res = users_repo::insert_user(
        pool,
        NewUser {
            id: &id,
            username,
            email,
            password_hash: &password_hash,
            role: Role::Member,
            department: Some(form.department.trim()),
            interests: (!interests.is_empty()).then_some(interests),
            created_at: now,
        },
    )
    .await;
    match res {
        Ok(_) => Ok(id),
        Err(e) if is_unique_violation(&e) => Err(Rejection::UsernameTaken.into()),
        Err(e) => Err(e.into()),
    }
}

/// Checks credentials and opens a session. The caller turns the returned
/// token into a cookie.
pub async fn login(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    now: DateTime<Utc>,
) -> ServiceResult<(UserRow, String)> {
    let user = users_repo::find_by_username(pool, username.trim())
        .await?
        .ok_or(ServiceError::Rejected(Rejection::BadCredentials))?;
    if !verify_password(password, &user.password_hash) {
        return Err(Rejection::BadCredentials.into());
    }

    let token = Uuid::new_v4().to_string();
    sessions_repo::insert_session(pool, &token, &user.id, now).await?;
    Ok((user, token))
}

pub async fn logout(pool: &SqlitePool, token: &str) -> ServiceResult<()> {
    sessions_repo::delete_session(pool, token).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RegisterForm {
        RegisterForm {
            username: "freshman".to_string(),
            email: "freshman@campus.edu".to_string(),
            password: "secret123".to_string(),
            password_confirm: "secret123".to_string(),
            department: "Physics".to_string(),
            interests: String::new(),
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(validate_registration(&form()).is_ok());
    }

    #[test]
    fn username_length_is_bounded() {
        let mut f = form();
        f.username = "abc".to_string();
        assert_eq!(validate_registration(&f), Err(Rejection::UsernameLength));
        f.username = "a".repeat(21);
        assert_eq!(validate_registration(&f), Err(Rejection::UsernameLength));
    }

    #[test]
    fn email_needs_an_at_sign_inside() {
        let mut f = form();
        f.email = "campus.edu".to_string();
        assert_eq!(validate_registration(&f), Err(Rejection::InvalidEmail));
        f.email = "@campus.edu".to_string();
        assert_eq!(validate_registration(&f), Err(Rejection::InvalidEmail));
    }

    #[test]
    fn short_or_mismatched_passwords_fail() {
        let mut f = form();
        f.password = "abc".to_string();
        f.password_confirm = "abc".to_string();
        assert_eq!(validate_registration(&f), Err(Rejection::PasswordLength));

        let mut f = form();
        f.password_confirm = "different".to_string();
        assert_eq!(validate_registration(&f), Err(Rejection::PasswordMismatch));
    }

    #[test]
    fn password_hash_verifies_and_rejects() {
        let hash = hash_password("secret123").unwrap();
        assert!(verify_password("secret123", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("secret123", "not-a-phc-string"));
    }
}
