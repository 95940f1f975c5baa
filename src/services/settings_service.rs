use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::models::settings::{
    AdvisorSettings, ConflictRules, RedistributionSettings, SuggestionSettings,
    WorkloadThresholds,
};

const MAX_HOUR: u32 = 24;
const MAX_LOAD_WINDOW_DAYS: i64 = 366;

/// Rejects settings the analyses cannot interpret meaningfully. The analyses
/// themselves never validate; callers run this once per request.
pub fn validate_settings(settings: &AdvisorSettings) -> AppResult<()> {
    validate_conflict_rules(&settings.conflicts)?;
    validate_workload_thresholds(&settings.workload)?;
    validate_suggestion_settings(&settings.suggestions)?;
    validate_redistribution_settings(&settings.redistribution)?;
    Ok(())
}

pub fn validate_conflict_rules(rules: &ConflictRules) -> AppResult<()> {
    ensure_working_hours(rules.working_hours_start, rules.working_hours_end)?;
    if !rules.daily_hours_limit.is_finite() || rules.daily_hours_limit <= 0.0 {
        return Err(AppError::validation_with_details(
            "dailyHoursLimit must be a positive number of hours",
            json!({ "dailyHoursLimit": rules.daily_hours_limit }),
        ));
    }
    ensure_non_negative("conflicts.minGapMinutes", rules.min_gap_minutes)
}

pub fn validate_workload_thresholds(thresholds: &WorkloadThresholds) -> AppResult<()> {
    ensure_positive("tasksPerDayOverload", thresholds.tasks_per_day_overload)?;
    ensure_positive(
        "highPriorityPerDayCritical",
        thresholds.high_priority_per_day_critical,
    )?;
    ensure_positive("tasksPerUserOverload", thresholds.tasks_per_user_overload)
}

pub fn validate_suggestion_settings(settings: &SuggestionSettings) -> AppResult<()> {
    ensure_working_hours(settings.working_hours_start, settings.working_hours_end)?;
    ensure_non_negative("suggestions.minGapMinutes", settings.min_gap_minutes)?;
    ensure_non_negative(
        "loadImbalanceThresholdMinutes",
        settings.load_imbalance_threshold_minutes,
    )
}

pub fn validate_redistribution_settings(settings: &RedistributionSettings) -> AppResult<()> {
    ensure_non_negative("loadWindowDays", settings.load_window_days)?;
    if settings.load_window_days > MAX_LOAD_WINDOW_DAYS {
        return Err(AppError::validation_with_details(
            format!("loadWindowDays must not exceed {MAX_LOAD_WINDOW_DAYS}"),
            json!({ "loadWindowDays": settings.load_window_days }),
        ));
    }
    Ok(())
}

fn ensure_working_hours(start: u32, end: u32) -> AppResult<()> {
    if start >= end || end > MAX_HOUR {
        return Err(AppError::validation_with_details(
            "working hours must satisfy 0 <= start < end <= 24",
            json!({ "workingHoursStart": start, "workingHoursEnd": end }),
        ));
    }
    Ok(())
}

fn ensure_positive(field: &str, value: usize) -> AppResult<()> {
    if value == 0 {
        return Err(AppError::validation_with_details(
            format!("{field} must be at least 1"),
            json!({ field: value }),
        ));
    }
    Ok(())
}

fn ensure_non_negative(field: &str, value: i64) -> AppResult<()> {
    if value < 0 {
        return Err(AppError::validation_with_details(
            format!("{field} must not be negative"),
            json!({ field: value }),
        ));
    }
    Ok(())
}
