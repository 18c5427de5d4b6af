use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// All timestamps are stored UTC; the campus displays and enters wall-clock
/// times in UTC+8. This module is the only place that conversion lives.
pub fn campus_zone() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap()
}

/// Temporal state of an activity, derived from the schedule on every read.
/// Orthogonal to the persisted moderation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalStatus {
    Registering,
    Ongoing,
    Ended,
}

impl TemporalStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TemporalStatus::Registering => "registering",
            TemporalStatus::Ongoing => "ongoing",
            TemporalStatus::Ended => "ended",
        }
    }
}

pub fn temporal_status(
    now: DateTime<Utc>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> TemporalStatus {
    if now < start {
        TemporalStatus::Registering
    } else if now <= end {
        TemporalStatus::Ongoing
    } else {
        TemporalStatus::Ended
    }
}

/// Half-open interval overlap: [s1,e1) and [s2,e2) collide iff
/// s1 < e2 and s2 < e1. Bookings that touch end-to-start do not conflict.
pub fn intervals_overlap(
    s1: DateTime<Utc>,
    e1: DateTime<Utc>,
    s2: DateTime<Utc>,
    e2: DateTime<Utc>,
) -> bool {
    s1 < e2 && s2 < e1
}

/// Parses the `YYYY-MM-DDTHH:MM` value of an `<input type="datetime-local">`
/// as campus wall time and converts to UTC for storage.
pub fn parse_form_datetime(input: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(input.trim(), "%Y-%m-%dT%H:%M").ok()?;
    let local = campus_zone().from_local_datetime(&naive).single()?;
    Some(local.with_timezone(&Utc))
}

pub fn parse_form_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

pub fn display_datetime(dt: DateTime<Utc>) -> String {
    dt.with_timezone(&campus_zone())
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Value for an `<input type="datetime-local">` pre-filled from storage.
pub fn form_datetime(dt: DateTime<Utc>) -> String {
    dt.with_timezone(&campus_zone())
        .format("%Y-%m-%dT%H:%M")
        .to_string()
}

/// Plain UTC timestamp for the `?N = '' OR datetime(..) ...` filter binds.
pub fn sql_datetime(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn overlapping_intervals_conflict() {
        // 10:00-12:00 vs 11:00-13:00
        assert!(intervals_overlap(
            utc(2026, 3, 1, 10, 0),
            utc(2026, 3, 1, 12, 0),
            utc(2026, 3, 1, 11, 0),
            utc(2026, 3, 1, 13, 0),
        ));
    }

    #[test]
    fn touching_intervals_do_not_conflict() {
        // 10:00-12:00 vs 12:00-13:00 share only the boundary instant
        assert!(!intervals_overlap(
            utc(2026, 3, 1, 10, 0),
            utc(2026, 3, 1, 12, 0),
            utc(2026, 3, 1, 12, 0),
            utc(2026, 3, 1, 13, 0),
        ));
    }

    #[test]
    fn contained_interval_conflicts() {
        assert!(intervals_overlap(
            utc(2026, 3, 1, 10, 0),
            utc(2026, 3, 1, 14, 0),
            utc(2026, 3, 1, 11, 0),
            utc(2026, 3, 1, 12, 0),
        ));
    }

    #[test]
    fn disjoint_intervals_do_not_conflict() {
        assert!(!intervals_overlap(
            utc(2026, 3, 1, 10, 0),
            utc(2026, 3, 1, 11, 0),
            utc(2026, 3, 1, 12, 0),
            utc(2026, 3, 1, 13, 0),
        ));
    }

    #[test]
    fn overlap_is_symmetric() {
        let (s1, e1) = (utc(2026, 3, 1, 10, 0), utc(2026, 3, 1, 12, 0));
        let (s2, e2) = (utc(2026, 3, 1, 11, 0), utc(2026, 3, 1, 13, 0));
        assert_eq!(
            intervals_overlap(s1, e1, s2, e2),
            intervals_overlap(s2, e2, s1, e1)
        );
    }

    #[test]
    fn status_before_start_is_registering() {
        let status = temporal_status(
            utc(2026, 3, 1, 9, 0),
            utc(2026, 3, 1, 10, 0),
            utc(2026, 3, 1, 12, 0),
        );
        assert_eq!(status, TemporalStatus::Registering);
    }

    #[test]
    fn status_at_boundaries_is_ongoing() {
        let start = utc(2026, 3, 1, 10, 0);
        let end = utc(2026, 3, 1, 12, 0);
        assert_eq!(temporal_status(start, start, end), TemporalStatus::Ongoing);
        assert_eq!(temporal_status(end, start, end), TemporalStatus::Ongoing);
    }

    #[test]
    fn status_after_end_is_ended() {
        let status = temporal_status(
            utc(2026, 3, 1, 12, 1),
            utc(2026, 3, 1, 10, 0),
            utc(2026, 3, 1, 12, 0),
        );
        assert_eq!(status, TemporalStatus::Ended);
    }

    #[test]
    fn form_input_is_campus_wall_time() {
        // 20:00 in UTC+8 is noon UTC
        let parsed = parse_form_datetime("2026-03-01T20:00").unwrap();
        assert_eq!(parsed, utc(2026, 3, 1, 12, 0));
    }

    #[test]
    fn display_converts_back_to_campus_time() {
        assert_eq!(display_datetime(utc(2026, 3, 1, 12, 0)), "2026-03-01 20:00");
    }

    #[test]
    fn form_roundtrip_is_lossless() {
        let raw = "2026-03-01T20:00";
        let parsed = parse_form_datetime(raw).unwrap();
        assert_eq!(form_datetime(parsed), raw);
    }

    #[test]
    fn garbage_input_does_not_parse() {
        assert!(parse_form_datetime("not-a-time").is_none());
        assert!(parse_form_date("2026-13-99").is_none());
    }
}
