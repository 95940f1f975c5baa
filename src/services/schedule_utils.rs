use chrono::{
    offset::LocalResult, DateTime, Duration, FixedOffset, NaiveDateTime, NaiveTime, TimeZone,
    Timelike,
};
use serde_json::json;

use crate::error::{AppError, AppResult};

pub const GRID_STEP_MINUTES: u32 = 15;
pub const LAST_GRID_MINUTE: u32 = 1425;
const MINUTES_PER_DAY: i64 = 24 * 60;
const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Timestamps without an offset are read as UTC.
pub fn try_parse_datetime(value: &str) -> Option<DateTime<FixedOffset>> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed);
    }
    let utc = FixedOffset::east_opt(0)?;
    NAIVE_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(trimmed, format)
            .ok()
            .map(|naive| utc.from_utc_datetime(&naive))
    })
}

pub fn parse_datetime(value: &str) -> AppResult<DateTime<FixedOffset>> {
    try_parse_datetime(value).ok_or_else(|| {
        AppError::validation_with_details("invalid timestamp", json!({ "value": value }))
    })
}

pub fn format_datetime(dt: DateTime<FixedOffset>) -> String {
    dt.to_rfc3339()
}

pub fn add_days(dt: DateTime<FixedOffset>, days: i64) -> AppResult<DateTime<FixedOffset>> {
    dt.checked_add_signed(Duration::days(days))
        .ok_or_else(|| AppError::validation("date arithmetic out of range"))
}

/// Whole minutes from `start` to `end`; inverted ranges count as zero.
pub fn duration_minutes(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> i64 {
    end.signed_duration_since(start).num_minutes().max(0)
}

pub fn overlaps(
    a_start: DateTime<FixedOffset>,
    a_end: DateTime<FixedOffset>,
    b_start: DateTime<FixedOffset>,
    b_end: DateTime<FixedOffset>,
) -> bool {
    a_start < b_end && b_start < a_end
}

pub fn minutes_from_midnight(dt: DateTime<FixedOffset>) -> i64 {
    let time = dt.time();
    (time.hour() as i64) * 60 + (time.minute() as i64)
}

/// `HH:MM` rendering of a minute-of-day offset.
pub fn format_clock(total_minutes: i64) -> String {
    let clamped = total_minutes.clamp(0, MINUTES_PER_DAY);
    format!("{:02}:{:02}", clamped / 60, clamped % 60)
}

pub fn format_hours(minutes: f64) -> String {
    format!("{:.1}h", minutes / 60.0)
}

/// Snaps a minute-of-day offset onto the 15-minute grid, clamped to
/// `[0, 1425]`.
pub fn snap_minutes(minutes_from_midnight: f64) -> u32 {
    if !minutes_from_midnight.is_finite() {
        return 0;
    }
    let clamped = minutes_from_midnight.clamp(0.0, LAST_GRID_MINUTE as f64);
    let step = GRID_STEP_MINUTES as f64;
    let snapped = (clamped / step).round() * step;
    (snapped as u32).min(LAST_GRID_MINUTE)
}

/// Snaps the time-of-day of `dt` onto the grid, keeping its date and offset.
pub fn snap_datetime(dt: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let time = dt.time();
    let raw = (time.hour() * 60 + time.minute()) as f64 + time.second() as f64 / 60.0;
    let snapped = to_naive_time(snap_minutes(raw));
    let naive = dt.date_naive().and_time(snapped);
    match dt.offset().from_local_datetime(&naive) {
        LocalResult::Single(value) => value,
        LocalResult::Ambiguous(first, _) => first,
        LocalResult::None => dt,
    }
}

pub fn to_naive_time(total_minutes: u32) -> NaiveTime {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    NaiveTime::from_hms_opt(hours, minutes, 0).unwrap_or(NaiveTime::MIN)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoursBreach {
    pub starts_before: bool,
    pub ends_after: bool,
}

/// Checks an item against the `[start_hour, end_hour]` working window of its
/// own day. An end on a later calendar day counts past midnight, so an item
/// that runs overnight always ends after hours.
pub fn working_hours_breach(
    start: Option<DateTime<FixedOffset>>,
    end: Option<DateTime<FixedOffset>>,
    start_hour: u32,
    end_hour: u32,
) -> Option<HoursBreach> {
    let window_start = (start_hour as i64) * 60;
    let window_end = (end_hour as i64) * 60;

    let starts_before = start
        .map(|value| minutes_from_midnight(value) < window_start)
        .unwrap_or(false);

    let ends_after = end
        .map(|value| {
            let reference_day = start.unwrap_or(value).date_naive();
            let day_offset = value
                .date_naive()
                .signed_duration_since(reference_day)
                .num_days();
            day_offset * MINUTES_PER_DAY + minutes_from_midnight(value) > window_end
        })
        .unwrap_or(false);

    if starts_before || ends_after {
        Some(HoursBreach {
            starts_before,
            ends_after,
        })
    } else {
        None
    }
}
