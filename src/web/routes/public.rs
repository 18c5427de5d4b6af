use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    Extension,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;

use crate::error::ServiceError;
use crate::models::Role;
use crate::services::activities_service::{self, IndexPageData, IndexQuery};
use crate::services::activity_detail_service::{self, ActivityDetailView};
use crate::services::engagement_service;
use crate::web::flash;
use crate::web::middleware::auth::MaybeUser;
use crate::web::routes::error_response;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub cards: Vec<activities_service::ActivityCardView>,
    pub hot_panel: Vec<activities_service::HotPanelEntry>,
    pub filters: activities_service::AppliedFilters,
    pub venues: Vec<crate::models::VenueRow>,
    pub types: Vec<crate::models::ActivityTypeRow>,
    pub pagination: activities_service::Pagination,
    pub recommend_mode: bool,
    pub notice: String,
    pub logged_in: bool,
    pub is_admin: bool,
    pub is_reviewer: bool,
}

pub async fn index_handler(
    Extension(MaybeUser(viewer)): Extension<MaybeUser>,
    Query(query): Query<IndexQuery>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    let now = Utc::now();
    let viewer_id = viewer.as_ref().map(|u| u.id.as_str());
    let data: IndexPageData =
        match activities_service::build_index_page(&pool, viewer_id, &query, now).await {
            Ok(data) => data,
            Err(e) => return error_response("index page", e),
        };

    let template = IndexTemplate {
        cards: data.cards,
        hot_panel: data.hot_panel,
        filters: data.filters,
        venues: data.venues,
        types: data.types,
        pagination: data.pagination,
        recommend_mode: data.recommend_mode,
        notice: query
            .notice
            .as_deref()
            .and_then(flash::text)
            .unwrap_or_default()
            .to_string(),
        logged_in: viewer.is_some(),
        is_admin: viewer.as_ref().is_some_and(|u| u.role == Role::Admin),
        is_reviewer: viewer.as_ref().is_some_and(|u| u.role == Role::Reviewer),
    };
    Html(template.render().unwrap()).into_response()
}

#[derive(Template)]
#[template(path = "activity_detail.html")]
pub struct ActivityDetailTemplate {
    pub activity: ActivityDetailView,
    pub notice: String,
    pub logged_in: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct DetailQuery {
    pub notice: Option<String>,
}

pub async fn activity_detail_handler(
    Extension(MaybeUser(viewer)): Extension<MaybeUser>,
    Path(activity_id): Path<String>,
    Query(query): Query<DetailQuery>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    let now = Utc::now();
    let viewer_ref = viewer.as_ref().map(|u| (u.id.as_str(), u.role));
    let view = match activity_detail_service::load_detail(&pool, &activity_id, viewer_ref, now)
        .await
    {
        Ok(view) => view,
        Err(e) => return error_response("activity detail", e),
    };

    let template = ActivityDetailTemplate {
        activity: view,
        notice: query
            .notice
            .as_deref()
            .and_then(flash::text)
            .unwrap_or_default()
            .to_string(),
        logged_in: viewer.is_some(),
    };
    Html(template.render().unwrap()).into_response()
}

/// Like toggle, answered as JSON for the in-page button.
pub async fn like_handler(
    Extension(MaybeUser(viewer)): Extension<MaybeUser>,
    Path(activity_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    let Some(user) = viewer else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Please sign in to like activities" })),
        )
            .into_response();
    };

    match engagement_service::toggle_like(&pool, &user.id, &activity_id, Utc::now()).await {
        Ok(outcome) => Json(json!({
            "success": true,
            "likes": outcome.likes,
            "liked": outcome.liked,
        }))
        .into_response(),
        Err(ServiceError::NotFound) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => error_response("like toggle", e),
    }
}
