use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::{activities_repo, participations_repo};
use crate::error::{is_unique_violation, Rejection, ServiceError, ServiceResult};
use crate::services::schedule_service::{self, TemporalStatus};

/// Signs the user up for an activity. Registration is only open before the
/// start time and while seats remain; the whole read-check-write sequence
/// runs in one transaction, with the UNIQUE(user_id, activity_id) index as
/// the backstop against concurrent duplicate joins.
pub async fn join_activity(
    pool: &SqlitePool,
    user_id: &str,
    activity_id: &str,
    now: DateTime<Utc>,
) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;

    let activity = activities_repo::find_by_id(&mut *tx, activity_id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let status = schedule_service::temporal_status(now, activity.start_time, activity.end_time);
    if status != TemporalStatus::Registering {
        return Err(Rejection::RegistrationClosed.into());
    }
    if participations_repo::exists(&mut *tx, user_id, activity_id).await? {
        return Err(Rejection::AlreadyJoined.into());
    }
    if activity.current_participants >= activity.max_participants {
        return Err(Rejection::ActivityFull.into());
    }

    let id = Uuid::new_v4().to_string();
    let inserted =
        participations_repo::insert_participation(&mut *tx, &id, user_id, activity_id, now).await;
    match inserted {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => return Err(Rejection::AlreadyJoined.into()),
        Err(e) => return Err(e.into()),
    }
    activities_repo::increment_participants(&mut *tx, activity_id).await?;

    tx.commit().await?;
    Ok(())
}

/// Removes the user's participation and gives the seat back. The counter
/// never goes below zero.
pub async fn quit_activity(
    pool: &SqlitePool,
    user_id: &str,
    activity_id: &str,
) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;

    activities_repo::find_by_id(&mut *tx, activity_id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let removed = participations_repo::delete_participation(&mut *tx, user_id, activity_id).await?;
    if removed == 0 {
        return Err(Rejection::NotJoined.into());
    }
    activities_repo::decrement_participants(&mut *tx, activity_id).await?;

    tx.commit().await?;
    Ok(())
}
