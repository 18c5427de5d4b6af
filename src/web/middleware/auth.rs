use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;
use tracing::warn;

use crate::database::sessions_repo;
use crate::models::Role;

pub const SESSION_COOKIE: &str = "session";

#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub id: String,
    pub username: String,
    pub role: Role,
}

/// Inserted on every page request; carries the resolved session, if any.
#[derive(Clone, Debug, Default)]
pub struct MaybeUser(pub Option<AuthenticatedUser>);

pub fn session_token(request: &Request) -> Option<String> {
    let cookies = request
        .headers()
        .get(header::COOKIE)
        .and_then(|hv| hv.to_str().ok())?;
    cookies
        .split("; ")
        .find_map(|c| c.strip_prefix("session="))
        .map(str::to_string)
}

/// Resolves the session cookie against the sessions table and stashes the
/// outcome in the request extensions. Never rejects; the guards below do.
pub async fn load_user(State(pool): State<SqlitePool>, mut request: Request, next: Next) -> Response {
    let mut user = None;
    if let Some(token) = session_token(&request) {
        match sessions_repo::find_user_by_token(&pool, &token).await {
            Ok(Some(row)) => {
                user = Some(AuthenticatedUser {
                    id: row.id,
                    username: row.username,
                    role: row.role,
                });
            }
            Ok(None) => {}
            Err(e) => warn!("session lookup failed: {}", e),
        }
    }
    request.extensions_mut().insert(MaybeUser(user));
    next.run(request).await
}

/// Promotes the resolved session to a required `AuthenticatedUser`
/// extension, or sends the visitor to the login page.
pub async fn require_auth(mut request: Request, next: Next) -> Response {
    let user = request
        .extensions()
        .get::<MaybeUser>()
        .and_then(|m| m.0.clone());
    match user {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => Redirect::to("/login").into_response(),
    }
}

pub async fn require_admin(request: Request, next: Next) -> Response {
    guard(request, next, Role::Admin).await
}

/// The review area is for reviewers only; admins manage, reviewers review.
pub async fn require_reviewer(request: Request, next: Next) -> Response {
    guard(request, next, Role::Reviewer).await
}

async fn guard(request: Request, next: Next, required: Role) -> Response {
    match request.extensions().get::<AuthenticatedUser>() {
        Some(user) if user.role == required => next.run(request).await,
        Some(_) => StatusCode::FORBIDDEN.into_response(),
        None => Redirect::to("/login").into_response(),
    }
}
