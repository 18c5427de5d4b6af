use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::database::comments_repo::CommentWithAuthorRow;
use crate::database::participations_repo::ParticipantRow;
use crate::database::{
    activities_repo, activity_types_repo, comments_repo, participations_repo, users_repo,
    venues_repo,
};
use crate::error::{Rejection, ServiceError, ServiceResult};
use crate::models::{ActivityRow, Role};
use crate::services::activity_detail_service::export_window_open;
use crate::services::schedule_service;

#[derive(Debug)]
pub struct CsvExport {
    pub filename: String,
    pub body: String,
}

/// Assembles the organizer's CSV report: activity record, engagement
/// statistics, the participant roster and the comment log. Only the
/// organizer (or an admin) may export, and only once the activity has been
/// over for a week.
pub async fn export_activity_csv(
    pool: &SqlitePool,
    actor_id: &str,
    actor_role: Role,
    activity_id: &str,
    now: DateTime<Utc>,
) -> ServiceResult<CsvExport> {
    let activity = activities_repo::find_by_id(pool, activity_id)
        .await?
        .ok_or(ServiceError::NotFound)?;
    if activity.organizer_id != actor_id && actor_role != Role::Admin {
        return Err(ServiceError::Forbidden);
    }
    if !export_window_open(&activity, now) {
        return Err(Rejection::NotExportableYet.into());
    }

    let organizer = users_repo::find_by_id(pool, &activity.organizer_id).await?;
    let venue = match activity.venue_id.as_deref() {
        Some(id) => venues_repo::find_by_id(pool, id).await?,
        None => None,
    };
    let activity_type = match activity.activity_type_id.as_deref() {
        Some(id) => activity_types_repo::find_by_id(pool, id).await?,
        None => None,
    };
    let participants = participations_repo::list_for_activity(pool, activity_id).await?;
    let comments = comments_repo::list_for_activity(pool, activity_id).await?;

    let body = render_csv(
        &activity,
        organizer.as_ref().map(|u| u.username.as_str()).unwrap_or(""),
        venue.as_ref().map(|v| v.name.as_str()),
        activity_type.as_ref().map(|t| t.name.as_str()),
        &participants,
        &comments,
    );
    Ok(CsvExport {
        filename: format!("activity_{}_data.csv", activity.id),
        body,
    })
}

fn render_csv(
    activity: &ActivityRow,
    organizer_name: &str,
    venue_name: Option<&str>,
    type_name: Option<&str>,
    participants: &[ParticipantRow],
    comments: &[CommentWithAuthorRow],
) -> String {
    let mut out = String::new();

    push_row(&mut out, &["Activity"]);
    push_row(&mut out, &["ID", &activity.id]);
    push_row(&mut out, &["Title", &activity.title]);
    push_row(
        &mut out,
        &["Description", activity.description.as_deref().unwrap_or("")],
    );
    push_row(&mut out, &["Type", type_name.unwrap_or("")]);
    push_row(&mut out, &["Venue", venue_name.unwrap_or("")]);
    push_row(
        &mut out,
        &[
            "Start time",
            &schedule_service::display_datetime(activity.start_time),
        ],
    );
    push_row(
        &mut out,
        &[
            "End time",
            &schedule_service::display_datetime(activity.end_time),
        ],
    );
    push_row(
        &mut out,
        &["Max participants", &activity.max_participants.to_string()],
    );
    push_row(
        &mut out,
        &[
            "Current participants",
            &activity.current_participants.to_string(),
        ],
    );
    push_row(&mut out, &["Tags", activity.tags.as_deref().unwrap_or("")]);
    push_row(&mut out, &["Status", &activity.status]);
    push_row(&mut out, &["Review status", &activity.review_status]);
    push_row(
        &mut out,
        &[
            "Review comment",
            activity.review_comment.as_deref().unwrap_or(""),
        ],
    );
    push_row(
        &mut out,
        &[
            "Created at",
            &schedule_service::display_datetime(activity.created_at),
        ],
    );
    push_row(&mut out, &["Organizer", organizer_name]);
    push_row(
        &mut out,
        &["Poster URL", activity.poster_url.as_deref().unwrap_or("")],
    );
    out.push('\n');

    let likes = activity.likes_count;
    let comment_count = comments.len() as i64;
    let participant_count = activity.current_participants;
    push_row(&mut out, &["Statistics"]);
    push_row(&mut out, &["Likes", &likes.to_string()]);
    push_row(&mut out, &["Comments", &comment_count.to_string()]);
    push_row(&mut out, &["Participants", &participant_count.to_string()]);
    push_row(
        &mut out,
        &[
            "Engagement score",
            &format!("{:.2}", engagement_score(likes, comment_count, participant_count)),
        ],
    );
    out.push('\n');

    push_row(&mut out, &["Participants"]);
    push_row(&mut out, &["User ID", "Username", "Status", "Registered at"]);
    for p in participants {
        push_row(
            &mut out,
            &[
                &p.user_id,
                &p.username,
                &p.status,
                &schedule_service::display_datetime(p.registered_at),
            ],
        );
    }
    out.push('\n');

    push_row(&mut out, &["Comments"]);
    push_row(&mut out, &["Username", "Comment", "Posted at"]);
    for c in comments {
        push_row(
            &mut out,
            &[
                &c.author_name,
                &c.content,
                &schedule_service::display_datetime(c.created_at),
            ],
        );
    }

    out
}

fn engagement_score(likes: i64, comments: i64, participants: i64) -> f64 {
    (likes + comments) as f64 / participants.max(1) as f64
}

fn push_row(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&csv_escape(field));
    }
    out.push('\n');
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn plain_fields_pass_through() {
        assert_eq!(csv_escape("Chess night"), "Chess night");
    }

    #[test]
    fn commas_and_quotes_are_quoted() {
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn engagement_score_never_divides_by_zero() {
        assert_eq!(engagement_score(3, 2, 0), 5.0);
        assert_eq!(engagement_score(10, 5, 5), 3.0);
    }

    #[test]
    fn report_contains_the_roster_and_stats() {
        let t = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let activity = ActivityRow {
            id: "a1".to_string(),
            title: "Spring fair, outdoors".to_string(),
            description: Some("desc".to_string()),
            start_time: t,
            end_time: t,
            organizer_id: "u1".to_string(),
            reviewer_id: None,
            venue_id: None,
            activity_type_id: None,
            max_participants: 100,
            current_participants: 2,
            tags: Some("fair".to_string()),
            status: "active".to_string(),
            review_status: "approved".to_string(),
            review_comment: None,
            review_time: None,
            is_approved: 1,
            poster_url: None,
            likes_count: 4,
            created_at: t,
        };
        let participants = vec![ParticipantRow {
            user_id: "u2".to_string(),
            username: "visitor".to_string(),
            status: "registered".to_string(),
            registered_at: t,
        }];
        let comments = vec![CommentWithAuthorRow {
            id: "c1".to_string(),
            content: "fun, loud".to_string(),
            user_id: "u2".to_string(),
            author_name: "visitor".to_string(),
            created_at: t,
        }];

        let csv = render_csv(&activity, "organizer", None, None, &participants, &comments);
        // Title with a comma gets quoted
        assert!(csv.contains("\"Spring fair, outdoors\""));
        assert!(csv.contains("visitor"));
        // (4 likes + 1 comment) / 2 participants
        assert!(csv.contains("Engagement score,2.50"));
    }
}
