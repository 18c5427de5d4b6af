use askama::Template;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use chrono::Utc;
use cookie::Cookie;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::error::ServiceError;
use crate::services::auth_service::{self, RegisterForm};
use crate::web::flash;
use crate::web::middleware::auth::{MaybeUser, SESSION_COOKIE};
use crate::web::routes::error_response;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: String,
    pub notice: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct AuthPageQuery {
    pub notice: Option<String>,
}

pub async fn login_page(
    Extension(MaybeUser(viewer)): Extension<MaybeUser>,
    axum::extract::Query(query): axum::extract::Query<AuthPageQuery>,
) -> Response {
    if viewer.is_some() {
        return Redirect::to("/").into_response();
    }
    let template = LoginTemplate {
        error: String::new(),
        notice: query
            .notice
            .as_deref()
            .and_then(flash::text)
            .unwrap_or_default()
            .to_string(),
    };
    Html(template.render().unwrap()).into_response()
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login_handler(
    State(pool): State<SqlitePool>,
    Form(form): Form<LoginForm>,
) -> Response {
    match auth_service::login(&pool, &form.username, &form.password, Utc::now()).await {
        Ok((_, token)) => {
            let mut response = Redirect::to("/").into_response();
            set_session_cookie(&mut response, &token);
            response
        }
        Err(ServiceError::Rejected(r)) => {
            let template = LoginTemplate {
                error: flash::text(r.code()).unwrap_or_default().to_string(),
                notice: String::new(),
            };
            Html(template.render().unwrap()).into_response()
        }
        Err(e) => error_response("login", e),
    }
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub error: String,
    pub form: RegisterForm,
}

pub async fn register_page(Extension(MaybeUser(viewer)): Extension<MaybeUser>) -> Response {
    if viewer.is_some() {
        return Redirect::to("/").into_response();
    }
    let template = RegisterTemplate {
        error: String::new(),
        form: RegisterForm::default(),
    };
    Html(template.render().unwrap()).into_response()
}

pub async fn register_handler(
    State(pool): State<SqlitePool>,
    Form(form): Form<RegisterForm>,
) -> Response {
    match auth_service::register(&pool, &form, Utc::now()).await {
        Ok(_) => Redirect::to("/login?notice=registered").into_response(),
        Err(ServiceError::Rejected(r)) => {
            let template = RegisterTemplate {
                error: flash::text(r.code()).unwrap_or_default().to_string(),
                form,
            };
            Html(template.render().unwrap()).into_response()
        }
        Err(e) => error_response("register", e),
    }
}

pub async fn logout_handler(State(pool): State<SqlitePool>, headers: HeaderMap) -> Response {
    let token = headers
        .get(header::COOKIE)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split("; ")
                .find_map(|c| c.strip_prefix("session="))
        })
        .map(str::to_string);

    if let Some(token) = token {
        if let Err(e) = auth_service::logout(&pool, &token).await {
            return error_response("logout", e);
        }
    }

    let mut response = Redirect::to("/login?notice=logged_out").into_response();
    clear_session_cookie(&mut response);
    response
}

fn set_session_cookie(response: &mut Response, token: &str) {
    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(cookie::SameSite::Lax);
    response
        .headers_mut()
        .append(header::SET_COOKIE, cookie.to_string().parse().unwrap());
}

fn clear_session_cookie(response: &mut Response) {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(cookie::SameSite::Lax);
    cookie.set_max_age(Some(cookie::time::Duration::ZERO));
    response
        .headers_mut()
        .append(header::SET_COOKIE, cookie.to_string().parse().unwrap());
}
