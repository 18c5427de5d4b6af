use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::database::{activity_types_repo, users_repo, venues_repo};
use crate::error::ServiceError;
use crate::models::{ActivityTypeRow, UserRow, VenueRow};
use crate::services::admin_service::{self, DashboardCounts};
use crate::web::flash;
use crate::web::middleware::auth::AuthenticatedUser;
use crate::web::routes::error_response;

#[derive(Template)]
#[template(path = "admin_dashboard.html")]
pub struct DashboardTemplate {
    pub counts: DashboardCounts,
}

pub async fn dashboard_handler(
    Extension(_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
) -> Response {
    match admin_service::dashboard_counts(&pool).await {
        Ok(counts) => {
            let template = DashboardTemplate { counts };
            Html(template.render().unwrap()).into_response()
        }
        Err(e) => error_response("admin dashboard", e),
    }
}

#[derive(Template)]
#[template(path = "admin_users.html")]
pub struct UsersTemplate {
    pub users: Vec<UserRow>,
    pub search: String,
    pub notice: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct UsersQuery {
    pub search: Option<String>,
    pub notice: Option<String>,
}

pub async fn users_handler(
    Extension(_user): Extension<AuthenticatedUser>,
    Query(query): Query<UsersQuery>,
    State(pool): State<SqlitePool>,
) -> Response {
    let search = query.search.unwrap_or_default();
    match users_repo::list(&pool, search.trim()).await {
        Ok(users) => {
            let template = UsersTemplate {
                users,
                search,
                notice: query
                    .notice
                    .as_deref()
                    .and_then(flash::text)
                    .unwrap_or_default()
                    .to_string(),
            };
            Html(template.render().unwrap()).into_response()
        }
        Err(e) => error_response("admin users", e.into()),
    }
}

#[derive(Debug, Deserialize)]
pub struct RoleForm {
    #[serde(default)]
    pub role: String,
}

pub async fn change_role_handler(
    Extension(user): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
    State(pool): State<SqlitePool>,
    Form(form): Form<RoleForm>,
) -> Response {
    let notice = match admin_service::change_role(&pool, &user.id, &user_id, &form.role).await {
        Ok(()) => "role_updated",
        Err(ServiceError::Rejected(r)) => r.code(),
        Err(e) => return error_response("change role", e),
    };
    Redirect::to(&format!("/admin/users?notice={notice}")).into_response()
}

#[derive(Template)]
#[template(path = "admin_venues.html")]
pub struct VenuesTemplate {
    pub venues: Vec<VenueRow>,
    pub notice: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

pub async fn venues_handler(
    Extension(_user): Extension<AuthenticatedUser>,
    Query(query): Query<NoticeQuery>,
    State(pool): State<SqlitePool>,
) -> Response {
    match venues_repo::list_all(&pool).await {
        Ok(venues) => {
            let template = VenuesTemplate {
                venues,
                notice: query
                    .notice
                    .as_deref()
                    .and_then(flash::text)
                    .unwrap_or_default()
                    .to_string(),
            };
            Html(template.render().unwrap()).into_response()
        }
        Err(e) => error_response("admin venues", e.into()),
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct VenueForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub capacity: String,
}

pub async fn create_venue_handler(
    Extension(_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
    Form(form): Form<VenueForm>,
) -> Response {
    let capacity = form.capacity.trim().parse::<i64>().unwrap_or(0);
    let notice =
        match admin_service::create_venue(&pool, &form.name, &form.address, capacity).await {
            Ok(_) => "venue_created",
            Err(ServiceError::Rejected(r)) => r.code(),
            Err(e) => return error_response("create venue", e),
        };
    Redirect::to(&format!("/admin/venues?notice={notice}")).into_response()
}

pub async fn update_venue_handler(
    Extension(_user): Extension<AuthenticatedUser>,
    Path(venue_id): Path<String>,
    State(pool): State<SqlitePool>,
    Form(form): Form<VenueForm>,
) -> Response {
    let capacity = form.capacity.trim().parse::<i64>().unwrap_or(0);
    let notice =
        match admin_service::update_venue(&pool, &venue_id, &form.name, &form.address, capacity)
            .await
        {
            Ok(()) => "venue_updated",
            Err(ServiceError::Rejected(r)) => r.code(),
            Err(e) => return error_response("update venue", e),
        };
    Redirect::to(&format!("/admin/venues?notice={notice}")).into_response()
}

pub async fn delete_venue_handler(
    Extension(_user): Extension<AuthenticatedUser>,
    Path(venue_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Response {
    let notice = match admin_service::delete_venue(&pool, &venue_id).await {
        Ok(()) => "venue_deleted",
        Err(ServiceError::Rejected(r)) => r.code(),
        Err(e) => return error_response("delete venue", e),
    };
    Redirect::to(&format!("/admin/venues?notice={notice}")).into_response()
}

#[derive(Template)]
#[template(path = "admin_activity_types.html")]
pub struct ActivityTypesTemplate {
    pub types: Vec<ActivityTypeRow>,
    pub notice: String,
}

pub async fn activity_types_handler(
    Extension(_user): Extension<AuthenticatedUser>,
    Query(query): Query<NoticeQuery>,
    State(pool): State<SqlitePool>,
) -> Response {
    match activity_types_repo::list_all(&pool).await {
        Ok(types) => {
            let template = ActivityTypesTemplate {
                types,
                notice: query
                    .notice
                    .as_deref()
                    .and_then(flash::text)
                    .unwrap_or_default()
                    .to_string(),
            };
            Html(template.render().unwrap()).into_response()
        }
        Err(e) => error_response("admin activity types", e.into()),
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ActivityTypeForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

pub async fn create_activity_type_handler(
    Extension(_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
    Form(form): Form<ActivityTypeForm>,
) -> Response {
    let notice =
        match admin_service::create_activity_type(&pool, &form.name, &form.description).await {
            Ok(_) => "type_created",
            Err(ServiceError::Rejected(r)) => r.code(),
            Err(e) => return error_response("create activity type", e),
        };
    Redirect::to(&format!("/admin/activity_types?notice={notice}")).into_response()
}

pub async fn update_activity_type_handler(
    Extension(_user): Extension<AuthenticatedUser>,
    Path(type_id): Path<String>,
    State(pool): State<SqlitePool>,
    Form(form): Form<ActivityTypeForm>,
) -> Response {
    let notice = match admin_service::update_activity_type(
        &pool,
        &type_id,
        &form.name,
        &form.description,
    )
    .await
    {
        Ok(()) => "type_updated",
        Err(ServiceError::Rejected(r)) => r.code(),
        Err(e) => return error_response("update activity type", e),
    };
    Redirect::to(&format!("/admin/activity_types?notice={notice}")).into_response()
}

pub async fn delete_activity_type_handler(
    Extension(_user): Extension<AuthenticatedUser>,
    Path(type_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Response {
    let notice = match admin_service::delete_activity_type(&pool, &type_id).await {
        Ok(()) => "type_deleted",
        Err(ServiceError::Rejected(r)) => r.code(),
        Err(e) => return error_response("delete activity type", e),
    };
    Redirect::to(&format!("/admin/activity_types?notice={notice}")).into_response()
}
