mod common;

use campus_activities::database::sessions_repo;
use campus_activities::error::{Rejection, ServiceError};
use campus_activities::models::Role;
use campus_activities::services::auth_service::{self, RegisterForm};
use chrono::Utc;
use common::test_pool;

fn register_form(username: &str, email: &str) -> RegisterForm {
    RegisterForm {
        username: username.to_string(),
        email: email.to_string(),
        password: "secret123".to_string(),
        password_confirm: "secret123".to_string(),
        department: "History".to_string(),
        interests: "reading".to_string(),
    }
}

fn rejection(err: ServiceError) -> Rejection {
    match err {
        ServiceError::Rejected(r) => r,
        other => panic!("expected a rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn registration_then_login_opens_a_session() {
    let pool = test_pool().await;

    let user_id = auth_service::register(&pool, &register_form("freshman", "f@campus.edu"), Utc::now())
        .await
        .expect("register");

    let (user, token) = auth_service::login(&pool, "freshman", "secret123", Utc::now())
        .await
        .expect("login");
    assert_eq!(user.id, user_id);
    assert_eq!(user.role, Role::Member);

    let resolved = sessions_repo::find_user_by_token(&pool, &token)
        .await
        .unwrap()
        .expect("session resolves");
    assert_eq!(resolved.id, user_id);

    auth_service::logout(&pool, &token).await.expect("logout");
    assert!(sessions_repo::find_user_by_token(&pool, &token)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn wrong_credentials_are_rejected_alike() {
    let pool = test_pool().await;
    auth_service::register(&pool, &register_form("freshman", "f@campus.edu"), Utc::now())
        .await
        .expect("register");

    let err = auth_service::login(&pool, "freshman", "wrong-password", Utc::now())
        .await
        .unwrap_err();
    assert_eq!(rejection(err), Rejection::BadCredentials);

    let err = auth_service::login(&pool, "nobody", "secret123", Utc::now())
        .await
        .unwrap_err();
    assert_eq!(rejection(err), Rejection::BadCredentials);
}

#[tokio::test]
async fn usernames_and_emails_are_unique() {
    let pool = test_pool().await;
    auth_service::register(&pool, &register_form("freshman", "f@campus.edu"), Utc::now())
        .await
        .expect("register");

    let err = auth_service::register(&pool, &register_form("freshman", "other@campus.edu"), Utc::now())
        .await
        .unwrap_err();
    assert_eq!(rejection(err), Rejection::UsernameTaken);

    let err = auth_service::register(&pool, &register_form("sophomore", "f@campus.edu"), Utc::now())
        .await
        .unwrap_err();
    assert_eq!(rejection(err), Rejection::EmailTaken);
}

#[tokio::test]
async fn stored_passwords_are_salted_hashes() {
    let pool = test_pool().await;
    auth_service::register(&pool, &register_form("freshman", "f@campus.edu"), Utc::now())
        .await
        .expect("register");

    let row = campus_activities::database::users_repo::find_by_username(&pool, "freshman")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(row.password_hash, "secret123");
    assert!(row.password_hash.starts_with("$argon2"));
}
