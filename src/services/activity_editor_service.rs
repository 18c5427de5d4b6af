use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::activities_repo::{self, ActivityChanges, NewActivity};
use crate::database::{
    activity_types_repo, comments_repo, likes_repo, notifications_repo, participations_repo,
    venues_repo,
};
use crate::error::{Rejection, ServiceError, ServiceResult};
use crate::models::{ActivityRow, Role};
use crate::services::schedule_service;

const PENDING_REVIEW_COMMENT: &str = "Awaiting reviewer decision";

#[derive(Debug, Deserialize, Default)]
pub struct ActivityForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub venue_id: String,
    #[serde(default)]
    pub activity_type_id: String,
    #[serde(default)]
    pub max_participants: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub poster_url: String,
}

#[derive(Debug, PartialEq)]
struct ValidatedSchedule {
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    max_participants: i64,
}

/// Shared head of the create/edit validation chain: field presence and a
/// sane time range. Venue checks come after, since they need lookups.
fn validate_form(form: &ActivityForm) -> Result<ValidatedSchedule, Rejection> {
    if form.title.trim().is_empty() {
        return Err(Rejection::TitleRequired);
    }
    if form.description.trim().is_empty() {
        return Err(Rejection::DescriptionRequired);
    }
    let start_time =
        schedule_service::parse_form_datetime(&form.start_time).ok_or(Rejection::BadTimeFormat)?;
    let end_time =
        schedule_service::parse_form_datetime(&form.end_time).ok_or(Rejection::BadTimeFormat)?;
    if end_time <= start_time {
        return Err(Rejection::EndBeforeStart);
    }
    let max_participants: i64 = form
        .max_participants
        .trim()
        .parse()
        .map_err(|_| Rejection::NonPositiveCapacity)?;
    if max_participants <= 0 {
        return Err(Rejection::NonPositiveCapacity);
    }
    Ok(ValidatedSchedule {
        start_time,
        end_time,
        max_participants,
    })
}

/// Capacity check runs before the conflict count; both only apply when a
/// venue is selected.
async fn check_venue(
    pool: &SqlitePool,
    venue_id: &str,
    schedule: &ValidatedSchedule,
    exclude_activity: &str,
) -> ServiceResult<()> {
    let venue = venues_repo::find_by_id(pool, venue_id)
        .await?
        .ok_or(ServiceError::Rejected(Rejection::VenueMissing))?;
    if schedule.max_participants > venue.capacity {
        return Err(Rejection::OverVenueCapacity.into());
    }
    let conflicts = activities_repo::count_venue_conflicts(
        pool,
        venue_id,
        schedule.start_time,
        schedule.end_time,
        exclude_activity,
    )
    .await?;
    if conflicts > 0 {
        return Err(Rejection::VenueConflict.into());
    }
    Ok(())
}

async fn check_type(pool: &SqlitePool, type_id: &str) -> ServiceResult<()> {
    activity_types_repo::find_by_id(pool, type_id)
        .await?
        .ok_or(ServiceError::Rejected(Rejection::TypeMissing))?;
    Ok(())
}

/// Creates a pending activity for the organizer. Venue and type are
/// required at creation; nothing is written if any validation step
/// rejects.
pub async fn create_activity(
    pool: &SqlitePool,
    organizer_id: &str,
    form: &ActivityForm,
    now: DateTime<Utc>,
) -> ServiceResult<String> {
    let schedule = validate_form(form).map_err(ServiceError::Rejected)?;
    if form.venue_id.is_empty() {
        return Err(Rejection::VenueMissing.into());
    }
    if form.activity_type_id.is_empty() {
        return Err(Rejection::TypeMissing.into());
    }
    check_venue(pool, &form.venue_id, &schedule, "").await?;
    check_type(pool, &form.activity_type_id).await?;

    let id = Uuid::new_v4().to_string();
    let tags = form.tags.trim();
    let poster = form.poster_url.trim();
    activities_repo::insert_activity(
        pool,
        NewActivity {
            id: &id,
            title: form.title.trim(),
            description: form.description.trim(),
            start_time: schedule.start_time,
            end_time: schedule.end_time,
            organizer_id,
            venue_id: Some(form.venue_id.as_str()),
            activity_type_id: Some(form.activity_type_id.as_str()),
            max_participants: schedule.max_participants,
            tags: (!tags.is_empty()).then_some(tags),
            poster_url: (!poster.is_empty()).then_some(poster),
            review_comment: PENDING_REVIEW_COMMENT,
            created_at: now,
        },
    )
    .await?;
    Ok(id)
}

/// Applies an edit from the organizer or an admin. The activity's own id
/// is excluded from the conflict count so an unchanged slot passes.
pub async fn update_activity(
    pool: &SqlitePool,
    actor_id: &str,
    actor_role: Role,
    activity_id: &str,
    form: &ActivityForm,
) -> ServiceResult<()> {
    let activity = activities_repo::find_by_id(pool, activity_id)
        .await?
        .ok_or(ServiceError::NotFound)?;
    authorize_manage(&activity, actor_id, actor_role)?;

    let schedule = validate_form(form).map_err(ServiceError::Rejected)?;
    if schedule.max_participants < activity.current_participants {
        return Err(Rejection::BelowCurrentParticipants.into());
    }
    if !form.venue_id.is_empty() {
        check_venue(pool, &form.venue_id, &schedule, activity_id).await?;
    }
    if !form.activity_type_id.is_empty() {
        check_type(pool, &form.activity_type_id).await?;
    }

    let tags = form.tags.trim();
    let poster = form.poster_url.trim();
    activities_repo::update_activity(
        pool,
        ActivityChanges {
            id: activity_id,
            title: form.title.trim(),
            description: form.description.trim(),
            start_time: schedule.start_time,
            end_time: schedule.end_time,
            venue_id: (!form.venue_id.is_empty()).then_some(form.venue_id.as_str()),
            activity_type_id: (!form.activity_type_id.is_empty())
                .then_some(form.activity_type_id.as_str()),
            max_participants: schedule.max_participants,
            tags: (!tags.is_empty()).then_some(tags),
            poster_url: (!poster.is_empty()).then_some(poster),
        },
    )
    .await?;
    Ok(())
}

/// Deletes an activity with everything hanging off it in one transaction.
pub async fn delete_activity(
    pool: &SqlitePool,
    actor_id: &str,
    actor_role: Role,
    activity_id: &str,
) -> ServiceResult<()> {
    let activity = activities_repo::find_by_id(pool, activity_id)
        .await?
        .ok_or(ServiceError::NotFound)?;
    authorize_manage(&activity, actor_id, actor_role)?;

    let mut tx = pool.begin().await?;
    likes_repo::delete_for_activity(&mut *tx, activity_id).await?;
    participations_repo::delete_for_activity(&mut *tx, activity_id).await?;
    comments_repo::delete_for_activity(&mut *tx, activity_id).await?;
    notifications_repo::delete_for_activity(&mut *tx, activity_id).await?;
    activities_repo::delete_activity(&mut *tx, activity_id).await?;
    tx.commit().await?;
    Ok(())
}

fn authorize_manage(activity: &ActivityRow, actor_id: &str, actor_role: Role) -> ServiceResult<()> {
    if activity.organizer_id != actor_id && actor_role != Role::Admin {
        return Err(ServiceError::Forbidden);
    }
    Ok(())
}
