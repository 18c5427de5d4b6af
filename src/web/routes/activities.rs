use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::database::{activities_repo, activity_types_repo, venues_repo};
use crate::error::ServiceError;
use crate::models::{ActivityTypeRow, VenueRow};
use crate::services::activities_service::IndexQuery;
use crate::services::activity_editor_service::{self, ActivityForm};
use crate::services::profile_service::{self, MyActivitiesPage, ProfileView};
use crate::services::{engagement_service, export_service, participation_service};
use crate::services::schedule_service;
use crate::web::flash;
use crate::web::middleware::auth::AuthenticatedUser;
use crate::web::routes::error_response;

#[derive(Template)]
#[template(path = "activity_form.html")]
pub struct ActivityFormTemplate {
    pub heading: String,
    pub action: String,
    pub form: ActivityForm,
    pub venues: Vec<VenueRow>,
    pub types: Vec<ActivityTypeRow>,
    pub error: String,
}

pub async fn create_activity_page(
    Extension(_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
) -> Response {
    match form_template(
        &pool,
        "Create activity",
        "/create_activity",
        ActivityForm::default(),
        String::new(),
    )
    .await
    {
        Ok(template) => Html(template.render().unwrap()).into_response(),
        Err(e) => error_response("create activity page", e),
    }
}

pub async fn create_activity_handler(
    Extension(user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
    Form(form): Form<ActivityForm>,
) -> Response {
    match activity_editor_service::create_activity(&pool, &user.id, &form, Utc::now()).await {
        Ok(_) => Redirect::to("/my_activities?notice=created").into_response(),
        Err(ServiceError::Rejected(r)) => {
            match form_template(
                &pool,
                "Create activity",
                "/create_activity",
                form,
                flash::text(r.code()).unwrap_or_default().to_string(),
            )
            .await
            {
                Ok(template) => Html(template.render().unwrap()).into_response(),
                Err(e) => error_response("create activity page", e),
            }
        }
        Err(e) => error_response("create activity", e),
    }
}

pub async fn edit_activity_page(
    Extension(user): Extension<AuthenticatedUser>,
    Path(activity_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Response {
    let activity = match activities_repo::find_by_id(&pool, &activity_id).await {
        Ok(Some(activity)) => activity,
        Ok(None) => return error_response("edit activity page", ServiceError::NotFound),
        Err(e) => return error_response("edit activity page", e.into()),
    };
    if activity.organizer_id != user.id && user.role != crate::models::Role::Admin {
        return error_response("edit activity page", ServiceError::Forbidden);
    }

    let form = ActivityForm {
        title: activity.title,
        description: activity.description.unwrap_or_default(),
        start_time: schedule_service::form_datetime(activity.start_time),
        end_time: schedule_service::form_datetime(activity.end_time),
        venue_id: activity.venue_id.unwrap_or_default(),
        activity_type_id: activity.activity_type_id.unwrap_or_default(),
        max_participants: activity.max_participants.to_string(),
        tags: activity.tags.unwrap_or_default(),
        poster_url: activity.poster_url.unwrap_or_default(),
    };
    let action = format!("/activity/{activity_id}/edit");
    match form_template(&pool, "Edit activity", &action, form, String::new()).await {
        Ok(template) => Html(template.render().unwrap()).into_response(),
        Err(e) => error_response("edit activity page", e),
    }
}

pub async fn edit_activity_handler(
    Extension(user): Extension<AuthenticatedUser>,
    Path(activity_id): Path<String>,
    State(pool): State<SqlitePool>,
    Form(form): Form<ActivityForm>,
) -> Response {
    match activity_editor_service::update_activity(&pool, &user.id, user.role, &activity_id, &form)
        .await
    {
        Ok(()) => {
            Redirect::to(&format!("/activity/{activity_id}?notice=updated")).into_response()
        }
        Err(ServiceError::Rejected(r)) => {
            let action = format!("/activity/{activity_id}/edit");
            match form_template(
                &pool,
                "Edit activity",
                &action,
                form,
                flash::text(r.code()).unwrap_or_default().to_string(),
            )
            .await
            {
                Ok(template) => Html(template.render().unwrap()).into_response(),
                Err(e) => error_response("edit activity page", e),
            }
        }
        Err(e) => error_response("edit activity", e),
    }
}

pub async fn delete_activity_handler(
    Extension(user): Extension<AuthenticatedUser>,
    Path(activity_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Response {
    match activity_editor_service::delete_activity(&pool, &user.id, user.role, &activity_id).await {
        Ok(()) => Redirect::to("/?notice=deleted").into_response(),
        Err(e) => error_response("delete activity", e),
    }
}

pub async fn join_activity_handler(
    Extension(user): Extension<AuthenticatedUser>,
    Path(activity_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Response {
    let notice = match participation_service::join_activity(&pool, &user.id, &activity_id, Utc::now())
        .await
    {
        Ok(()) => "joined",
        Err(ServiceError::Rejected(r)) => r.code(),
        Err(e) => return error_response("join activity", e),
    };
    Redirect::to(&format!("/activity/{activity_id}?notice={notice}")).into_response()
}

pub async fn quit_activity_handler(
    Extension(user): Extension<AuthenticatedUser>,
    Path(activity_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Response {
    let notice = match participation_service::quit_activity(&pool, &user.id, &activity_id).await {
        Ok(()) => "quit",
        Err(ServiceError::Rejected(r)) => r.code(),
        Err(e) => return error_response("quit activity", e),
    };
    Redirect::to(&format!("/activity/{activity_id}?notice={notice}")).into_response()
}

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub content: String,
}

pub async fn comment_handler(
    Extension(user): Extension<AuthenticatedUser>,
    Path(activity_id): Path<String>,
    State(pool): State<SqlitePool>,
    Form(form): Form<CommentForm>,
) -> Response {
    let notice =
        match engagement_service::add_comment(&pool, &user.id, &activity_id, &form.content, Utc::now())
            .await
        {
            Ok(()) => "commented",
            Err(ServiceError::Rejected(r)) => r.code(),
            Err(e) => return error_response("add comment", e),
        };
    Redirect::to(&format!("/activity/{activity_id}?notice={notice}")).into_response()
}

#[derive(Template)]
#[template(path = "my_activities.html")]
pub struct MyActivitiesTemplate {
    pub page: MyActivitiesPage,
    pub notice: String,
}

pub async fn my_activities_handler(
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<IndexQuery>,
    State(pool): State<SqlitePool>,
) -> Response {
    match profile_service::load_my_activities(&pool, &user.id, &query, Utc::now()).await {
        Ok(page) => {
            let template = MyActivitiesTemplate {
                page,
                notice: query
                    .notice
                    .as_deref()
                    .and_then(flash::text)
                    .unwrap_or_default()
                    .to_string(),
            };
            Html(template.render().unwrap()).into_response()
        }
        Err(e) => error_response("my activities", e),
    }
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub profile: ProfileView,
}

pub async fn profile_handler(
    Extension(user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
) -> Response {
    let row = match crate::database::users_repo::find_by_id(&pool, &user.id).await {
        Ok(Some(row)) => row,
        Ok(None) => return error_response("profile", ServiceError::NotFound),
        Err(e) => return error_response("profile", e.into()),
    };
    match profile_service::load_profile(&pool, &row, Utc::now()).await {
        Ok(profile) => {
            let template = ProfileTemplate { profile };
            Html(template.render().unwrap()).into_response()
        }
        Err(e) => error_response("profile", e),
    }
}

pub async fn export_handler(
    Extension(user): Extension<AuthenticatedUser>,
    Path(activity_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Response {
    match export_service::export_activity_csv(&pool, &user.id, user.role, &activity_id, Utc::now())
        .await
    {
        Ok(export) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", export.filename),
                ),
            ],
            export.body,
        )
            .into_response(),
        Err(ServiceError::Rejected(r)) => {
            Redirect::to(&format!("/activity/{activity_id}?notice={}", r.code())).into_response()
        }
        Err(e) => error_response("export activity", e),
    }
}

async fn form_template(
    pool: &SqlitePool,
    heading: &str,
    action: &str,
    form: ActivityForm,
    error: String,
) -> Result<ActivityFormTemplate, ServiceError> {
    let venues = venues_repo::list_all(pool).await?;
    let types = activity_types_repo::list_all(pool).await?;
    Ok(ActivityFormTemplate {
        heading: heading.to_string(),
        action: action.to_string(),
        form,
        venues,
        types,
        error,
    })
}
