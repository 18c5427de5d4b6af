use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::{activities_repo, activity_types_repo, users_repo, venues_repo};
use crate::error::{is_unique_violation, Rejection, ServiceError, ServiceResult};
use crate::models::Role;

#[derive(Debug, Clone, Copy)]
pub struct DashboardCounts {
    pub users: i64,
    pub activities: i64,
    pub venues: i64,
    pub activity_types: i64,
    pub pending_reviews: i64,
}

pub async fn dashboard_counts(pool: &SqlitePool) -> ServiceResult<DashboardCounts> {
    Ok(DashboardCounts {
        users: users_repo::count(pool).await?,
        activities: activities_repo::count_all(pool).await?,
        venues: venues_repo::count(pool).await?,
        activity_types: activity_types_repo::count(pool).await?,
        pending_reviews: activities_repo::count_pending_review(pool).await?,
    })
}

/// Assigns a user one role out of the closed set. Admins cannot touch
/// their own role, so the last admin cannot lock themselves out by
/// accident.
pub async fn change_role(
    pool: &SqlitePool,
    actor_id: &str,
    target_user_id: &str,
    role_value: &str,
) -> ServiceResult<()> {
    if actor_id == target_user_id {
        return Err(Rejection::SelfRoleChange.into());
    }
    let role = Role::parse(role_value).ok_or(ServiceError::Rejected(Rejection::BadRole))?;
    users_repo::find_by_id(pool, target_user_id)
        .await?
        .ok_or(ServiceError::NotFound)?;
    users_repo::update_role(pool, target_user_id, role).await?;
    Ok(())
}

fn validate_venue(name: &str, address: &str, capacity: i64) -> Result<(), Rejection> {
    if name.trim().is_empty() {
        return Err(Rejection::NameRequired);
    }
    if address.trim().is_empty() {
        return Err(Rejection::AddressRequired);
    }
    if capacity <= 0 {
        return Err(Rejection::NonPositiveCapacity);
    }
    Ok(())
}

pub async fn create_venue(
    pool: &SqlitePool,
    name: &str,
    address: &str,
    capacity: i64,
) -> ServiceResult<String> {
    validate_venue(name, address, capacity).map_err(ServiceError::Rejected)?;
    let id = Uuid::new_v4().to_string();
    let res = venues_repo::insert_venue(pool, &id, name.trim(), address.trim(), capacity).await;
    map_name_collision(res)?;
    Ok(id)
}

pub async fn update_venue(
    pool: &SqlitePool,
    venue_id: &str,
    name: &str,
    address: &str,
    capacity: i64,
) -> ServiceResult<()> {
    validate_venue(name, address, capacity).map_err(ServiceError::Rejected)?;
    venues_repo::find_by_id(pool, venue_id)
        .await?
        .ok_or(ServiceError::NotFound)?;
    let res = venues_repo::update_venue(pool, venue_id, name.trim(), address.trim(), capacity).await;
    map_name_collision(res)?;
    Ok(())
}

/// Deletion is blocked while any activity still points at the venue.
pub async fn delete_venue(pool: &SqlitePool, venue_id: &str) -> ServiceResult<()> {
    venues_repo::find_by_id(pool, venue_id)
        .await?
        .ok_or(ServiceError::NotFound)?;
    if activities_repo::venue_in_use(pool, venue_id).await? {
        return Err(Rejection::VenueInUse.into());
    }
    venues_repo::delete_venue(pool, venue_id).await?;
    Ok(())
}

pub async fn create_activity_type(
    pool: &SqlitePool,
    name: &str,
    description: &str,
) -> ServiceResult<String> {
    if name.trim().is_empty() {
        return Err(Rejection::NameRequired.into());
    }
    let id = Uuid::new_v4().to_string();
    let description = description.trim();
    let res = activity_types_repo::insert_type(
        pool,
        &id,
        name.trim(),
        (!description.is_empty()).then_some(description),
    )
    .await;
    map_name_collision(res)?;
    Ok(id)
}

pub async fn update_activity_type(
    pool: &SqlitePool,
    type_id: &str,
    name: &str,
    description: &str,
) -> ServiceResult<()> {
    if name.trim().is_empty() {
        return Err(Rejection::NameRequired.into());
    }
    activity_types_repo::find_by_id(pool, type_id)
        .await?
        .ok_or(ServiceError::NotFound)?;
    let description = description.trim();
    let res = activity_types_repo::update_type(
        pool,
        type_id,
        name.trim(),
        (!description.is_empty()).then_some(description),
    )
    .await;
    map_name_collision(res)?;
    Ok(())
}

pub async fn delete_activity_type(pool: &SqlitePool, type_id: &str) -> ServiceResult<()> {
    activity_types_repo::find_by_id(pool, type_id)
        .await?
        .ok_or(ServiceError::NotFound)?;
    if activities_repo::type_in_use(pool, type_id).await? {
        return Err(Rejection::TypeInUse.into());
    }
    activity_types_repo::delete_type(pool, type_id).await?;
    Ok(())
}

fn map_name_collision(res: sqlx::Result<u64>) -> ServiceResult<u64> {
    match res {
        Ok(n) => Ok(n),
        Err(e) if is_unique_violation(&e) => Err(Rejection::NameTaken.into()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn venue_needs_name_address_and_capacity() {
        assert_eq!(validate_venue("", "addr", 10), Err(Rejection::NameRequired));
        assert_eq!(validate_venue("Gym", " ", 10), Err(Rejection::AddressRequired));
        assert_eq!(
            validate_venue("Gym", "addr", 0),
            Err(Rejection::NonPositiveCapacity)
        );
        assert!(validate_venue("Gym", "addr", 10).is_ok());
    }
}
