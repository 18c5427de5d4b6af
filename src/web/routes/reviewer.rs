use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::error::ServiceError;
use crate::services::review_service::{self, ReviewItemView};
use crate::web::flash;
use crate::web::middleware::auth::AuthenticatedUser;
use crate::web::routes::error_response;

#[derive(Template)]
#[template(path = "review_list.html")]
pub struct ReviewListTemplate {
    pub items: Vec<ReviewItemView>,
    pub notice: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct ReviewListQuery {
    pub notice: Option<String>,
}

pub async fn review_list_handler(
    Extension(_user): Extension<AuthenticatedUser>,
    Query(query): Query<ReviewListQuery>,
    State(pool): State<SqlitePool>,
) -> Response {
    match review_service::pending_queue(&pool).await {
        Ok(items) => {
            let template = ReviewListTemplate {
                items,
                notice: query
                    .notice
                    .as_deref()
                    .and_then(flash::text)
                    .unwrap_or_default()
                    .to_string(),
            };
            Html(template.render().unwrap()).into_response()
        }
        Err(e) => error_response("review list", e),
    }
}

#[derive(Template)]
#[template(path = "review_detail.html")]
pub struct ReviewDetailTemplate {
    pub item: ReviewItemView,
}

pub async fn review_page(
    Extension(_user): Extension<AuthenticatedUser>,
    Path(activity_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Response {
    match review_service::load_item(&pool, &activity_id).await {
        Ok(item) => {
            let template = ReviewDetailTemplate { item };
            Html(template.render().unwrap()).into_response()
        }
        Err(e) => error_response("review page", e),
    }
}

#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    #[serde(default)]
    pub review_status: String,
    #[serde(default)]
    pub review_comment: String,
}

pub async fn review_handler(
    Extension(user): Extension<AuthenticatedUser>,
    Path(activity_id): Path<String>,
    State(pool): State<SqlitePool>,
    Form(form): Form<ReviewForm>,
) -> Response {
    let notice = match review_service::decide(
        &pool,
        &user.id,
        &activity_id,
        &form.review_status,
        &form.review_comment,
        Utc::now(),
    )
    .await
    {
        Ok(()) => "reviewed",
        Err(ServiceError::Rejected(r)) => r.code(),
        Err(e) => return error_response("review decision", e),
    };
    Redirect::to(&format!("/review/list?notice={notice}")).into_response()
}

#[derive(Template)]
#[template(path = "review_history.html")]
pub struct ReviewHistoryTemplate {
    pub items: Vec<ReviewItemView>,
}

pub async fn review_history_handler(
    Extension(user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
) -> Response {
    match review_service::history(&pool, &user.id).await {
        Ok(items) => {
            let template = ReviewHistoryTemplate { items };
            Html(template.render().unwrap()).into_response()
        }
        Err(e) => error_response("review history", e),
    }
}
