mod common;

use campus_activities::database::activities_repo;
use campus_activities::error::{Rejection, ServiceError};
use campus_activities::models::Role;
use campus_activities::services::activity_editor_service::{self, ActivityForm};
use chrono::Utc;
use common::{seed_type, seed_user, seed_venue, test_pool};

fn form(venue_id: &str, type_id: &str, start: &str, end: &str, max: i64) -> ActivityForm {
    ActivityForm {
        title: "Booking".to_string(),
        description: "Venue booking scenario".to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        venue_id: venue_id.to_string(),
        activity_type_id: type_id.to_string(),
        max_participants: max.to_string(),
        tags: String::new(),
        poster_url: String::new(),
    }
}

fn rejection(err: ServiceError) -> Rejection {
    match err {
        ServiceError::Rejected(r) => r,
        other => panic!("expected a rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn overlapping_booking_at_the_same_venue_is_rejected() {
    let pool = test_pool().await;
    let organizer = seed_user(&pool, "organizer", Role::Member).await;
    let venue = seed_venue(&pool, "Gym", 100).await;
    let type_id = seed_type(&pool, "Sports").await;

    activity_editor_service::create_activity(
        &pool,
        &organizer,
        &form(&venue, &type_id, "2027-05-01T10:00", "2027-05-01T12:00", 50),
        Utc::now(),
    )
    .await
    .expect("first booking");

    // 11:00-13:00 overlaps 10:00-12:00
    let err = activity_editor_service::create_activity(
        &pool,
        &organizer,
        &form(&venue, &type_id, "2027-05-01T11:00", "2027-05-01T13:00", 50),
        Utc::now(),
    )
    .await
    .unwrap_err();
    assert_eq!(rejection(err), Rejection::VenueConflict);

    // nothing was written for the rejected request
    assert_eq!(activities_repo::count_all(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn touching_bookings_do_not_conflict() {
    let pool = test_pool().await;
    let organizer = seed_user(&pool, "organizer", Role::Member).await;
    let venue = seed_venue(&pool, "Gym", 100).await;
    let type_id = seed_type(&pool, "Sports").await;

    activity_editor_service::create_activity(
        &pool,
        &organizer,
        &form(&venue, &type_id, "2027-05-01T10:00", "2027-05-01T12:00", 50),
        Utc::now(),
    )
    .await
    .expect("first booking");

    // 12:00-13:00 only touches the 12:00 boundary
    activity_editor_service::create_activity(
        &pool,
        &organizer,
        &form(&venue, &type_id, "2027-05-01T12:00", "2027-05-01T13:00", 50),
        Utc::now(),
    )
    .await
    .expect("back-to-back booking");

    assert_eq!(activities_repo::count_all(&pool).await.unwrap(), 2);
}

#[tokio::test]
async fn same_slot_at_another_venue_is_fine() {
    let pool = test_pool().await;
    let organizer = seed_user(&pool, "organizer", Role::Member).await;
    let gym = seed_venue(&pool, "Gym", 100).await;
    let hall = seed_venue(&pool, "Hall", 100).await;
    let type_id = seed_type(&pool, "Sports").await;

    activity_editor_service::create_activity(
        &pool,
        &organizer,
        &form(&gym, &type_id, "2027-05-01T10:00", "2027-05-01T12:00", 50),
        Utc::now(),
    )
    .await
    .expect("gym booking");

    activity_editor_service::create_activity(
        &pool,
        &organizer,
        &form(&hall, &type_id, "2027-05-01T10:00", "2027-05-01T12:00", 50),
        Utc::now(),
    )
    .await
    .expect("hall booking");
}

#[tokio::test]
async fn capacity_check_runs_before_the_conflict_check() {
    let pool = test_pool().await;
    let organizer = seed_user(&pool, "organizer", Role::Member).await;
    let venue = seed_venue(&pool, "Gym", 100).await;
    let type_id = seed_type(&pool, "Sports").await;

    let err = activity_editor_service::create_activity(
        &pool,
        &organizer,
        &form(&venue, &type_id, "2027-05-01T10:00", "2027-05-01T12:00", 150),
        Utc::now(),
    )
    .await
    .unwrap_err();
    assert_eq!(rejection(err), Rejection::OverVenueCapacity);
    assert_eq!(activities_repo::count_all(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn editing_an_activity_into_its_own_slot_passes() {
    let pool = test_pool().await;
    let organizer = seed_user(&pool, "organizer", Role::Member).await;
    let venue = seed_venue(&pool, "Gym", 100).await;
    let type_id = seed_type(&pool, "Sports").await;

    let id = activity_editor_service::create_activity(
        &pool,
        &organizer,
        &form(&venue, &type_id, "2027-05-01T10:00", "2027-05-01T12:00", 50),
        Utc::now(),
    )
    .await
    .expect("booking");

    // unchanged slot must not conflict with itself
    activity_editor_service::update_activity(
        &pool,
        &organizer,
        Role::Member,
        &id,
        &form(&venue, &type_id, "2027-05-01T10:00", "2027-05-01T12:00", 50),
    )
    .await
    .expect("self edit");
}

#[tokio::test]
async fn editing_into_another_booking_is_rejected() {
    let pool = test_pool().await;
    let organizer = seed_user(&pool, "organizer", Role::Member).await;
    let venue = seed_venue(&pool, "Gym", 100).await;
    let type_id = seed_type(&pool, "Sports").await;

    activity_editor_service::create_activity(
        &pool,
        &organizer,
        &form(&venue, &type_id, "2027-05-01T10:00", "2027-05-01T12:00", 50),
        Utc::now(),
    )
    .await
    .expect("first booking");
    let second = activity_editor_service::create_activity(
        &pool,
        &organizer,
        &form(&venue, &type_id, "2027-05-01T14:00", "2027-05-01T16:00", 50),
        Utc::now(),
    )
    .await
    .expect("second booking");

    let err = activity_editor_service::update_activity(
        &pool,
        &organizer,
        Role::Member,
        &second,
        &form(&venue, &type_id, "2027-05-01T11:00", "2027-05-01T15:00", 50),
    )
    .await
    .unwrap_err();
    assert_eq!(rejection(err), Rejection::VenueConflict);
}

#[tokio::test]
async fn only_the_organizer_or_an_admin_may_edit() {
    let pool = test_pool().await;
    let organizer = seed_user(&pool, "organizer", Role::Member).await;
    let stranger = seed_user(&pool, "stranger", Role::Member).await;
    let admin = seed_user(&pool, "staff", Role::Admin).await;
    let venue = seed_venue(&pool, "Gym", 100).await;
    let type_id = seed_type(&pool, "Sports").await;

    let id = activity_editor_service::create_activity(
        &pool,
        &organizer,
        &form(&venue, &type_id, "2027-05-01T10:00", "2027-05-01T12:00", 50),
        Utc::now(),
    )
    .await
    .expect("booking");

    let err = activity_editor_service::update_activity(
        &pool,
        &stranger,
        Role::Member,
        &id,
        &form(&venue, &type_id, "2027-05-01T10:00", "2027-05-01T12:00", 50),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden));

    activity_editor_service::update_activity(
        &pool,
        &admin,
        Role::Admin,
        &id,
        &form(&venue, &type_id, "2027-05-01T10:00", "2027-05-01T12:00", 60),
    )
    .await
    .expect("admin edit");
}

#[tokio::test]
async fn deleting_an_activity_cascades_its_records() {
    let pool = test_pool().await;
    let organizer = seed_user(&pool, "organizer", Role::Member).await;
    let venue = seed_venue(&pool, "Gym", 100).await;
    let type_id = seed_type(&pool, "Sports").await;

    let id = activity_editor_service::create_activity(
        &pool,
        &organizer,
        &form(&venue, &type_id, "2027-05-01T10:00", "2027-05-01T12:00", 50),
        Utc::now(),
    )
    .await
    .expect("booking");

    activity_editor_service::delete_activity(&pool, &organizer, Role::Member, &id)
        .await
        .expect("delete");
    assert_eq!(activities_repo::count_all(&pool).await.unwrap(), 0);

    let err = activity_editor_service::delete_activity(&pool, &organizer, Role::Member, &id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound));
}
