use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;

use crate::database::{
    activities_repo, activity_types_repo, comments_repo, likes_repo, participations_repo,
    venues_repo,
};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{ActivityRow, Role};
use crate::services::activities_service::split_tags;
use crate::services::schedule_service;

/// Organizer data export unlocks one week after an activity ends.
pub const EXPORT_WAIT_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct CommentView {
    pub author_name: String,
    pub content: String,
    pub time_label: String,
}

#[derive(Debug)]
pub struct ActivityDetailView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_label: String,
    pub end_label: String,
    pub created_label: String,
    pub venue_name: String,
    pub venue_address: String,
    pub type_name: String,
    pub organizer_id: String,
    pub organizer_name: String,
    pub tags: Vec<String>,
    pub temporal_label: String,
    pub status: String,
    pub review_status: String,
    pub review_comment: String,
    pub max_participants: i64,
    pub current_participants: i64,
    pub likes_count: i64,
    pub poster_url: String,
    pub is_joined: bool,
    pub is_liked: bool,
    pub can_manage: bool,
    pub is_exportable: bool,
    pub comments: Vec<CommentView>,
}

/// Builds the detail page. Activities that have not passed review are
/// visible only to their organizer, admins and reviewers.
pub async fn load_detail(
    pool: &SqlitePool,
    activity_id: &str,
    viewer: Option<(&str, Role)>,
    now: DateTime<Utc>,
) -> ServiceResult<ActivityDetailView> {
    let activity = activities_repo::find_by_id(pool, activity_id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    if activity.is_approved == 0 && !may_see_unapproved(&activity, viewer) {
        return Err(ServiceError::Forbidden);
    }

    let organizer = crate::database::users_repo::find_by_id(pool, &activity.organizer_id).await?;
    let venue = match activity.venue_id.as_deref() {
        Some(id) => venues_repo::find_by_id(pool, id).await?,
        None => None,
    };
    let activity_type = match activity.activity_type_id.as_deref() {
        Some(id) => activity_types_repo::find_by_id(pool, id).await?,
        None => None,
    };

    let comment_rows = comments_repo::list_for_activity(pool, activity_id).await?;
    let comments = comment_rows
        .into_iter()
        .map(|c| CommentView {
            author_name: c.author_name,
            content: c.content,
            time_label: schedule_service::display_datetime(c.created_at),
        })
        .collect();

    let (is_joined, is_liked) = match viewer {
        Some((viewer_id, _)) => (
            participations_repo::exists(pool, viewer_id, activity_id).await?,
            likes_repo::exists(pool, viewer_id, activity_id).await?,
        ),
        None => (false, false),
    };

    let can_manage = viewer.is_some_and(|(viewer_id, role)| {
        viewer_id == activity.organizer_id || role == Role::Admin
    });
    let is_exportable = can_manage && export_window_open(&activity, now);

    let temporal = schedule_service::temporal_status(now, activity.start_time, activity.end_time);

    Ok(ActivityDetailView {
        id: activity.id,
        title: activity.title,
        description: activity.description.unwrap_or_default(),
        start_label: schedule_service::display_datetime(activity.start_time),
        end_label: schedule_service::display_datetime(activity.end_time),
        created_label: schedule_service::display_datetime(activity.created_at),
        venue_name: venue.as_ref().map(|v| v.name.clone()).unwrap_or_default(),
        venue_address: venue.as_ref().map(|v| v.address.clone()).unwrap_or_default(),
        type_name: activity_type.map(|t| t.name).unwrap_or_default(),
        organizer_id: activity.organizer_id,
        organizer_name: organizer.map(|u| u.username).unwrap_or_default(),
        tags: split_tags(activity.tags.as_deref()),
        temporal_label: temporal.label().to_string(),
        status: activity.status,
        review_status: activity.review_status,
        review_comment: activity.review_comment.unwrap_or_default(),
        max_participants: activity.max_participants,
        current_participants: activity.current_participants,
        likes_count: activity.likes_count,
        poster_url: activity.poster_url.unwrap_or_default(),
        is_joined,
        is_liked,
        can_manage,
        is_exportable,
        comments,
    })
}

fn may_see_unapproved(activity: &ActivityRow, viewer: Option<(&str, Role)>) -> bool {
    viewer.is_some_and(|(viewer_id, role)| {
        viewer_id == activity.organizer_id || role == Role::Admin || role == Role::Reviewer
    })
}

pub fn export_window_open(activity: &ActivityRow, now: DateTime<Utc>) -> bool {
    now - activity.end_time >= Duration::days(EXPORT_WAIT_DAYS)
}
