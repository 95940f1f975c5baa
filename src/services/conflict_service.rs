use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::models::item::ScheduledItem;
use crate::models::settings::ConflictRules;
use crate::models::violation::{
    ConflictReport, Violation, ViolationKind, ViolationSeverity, ViolationSummary,
};
use crate::services::interval_index::{GroupKey, IntervalIndex, TimedItem};
use crate::services::schedule_utils;

/// Runs every conflict rule over a snapshot.
pub fn evaluate_conflicts(items: &[ScheduledItem], rules: &ConflictRules) -> ConflictReport {
    let index = IntervalIndex::build(items);
    evaluate_index(&index, rules)
}

pub fn evaluate_index(index: &IntervalIndex<'_>, rules: &ConflictRules) -> ConflictReport {
    let mut violations = Vec::new();

    for (key, group) in index.groups() {
        detect_overlaps(group, &mut violations);
        detect_impossible_timing(group, rules.min_gap_minutes, &mut violations);
        detect_daily_overload(key, group, rules.daily_limit_minutes(), &mut violations);
    }

    for timed in index.timed_items() {
        check_working_hours(
            &timed.item.id,
            Some(timed.start()),
            Some(timed.end()),
            rules,
            &mut violations,
        );
    }
    for item in index.unscheduled() {
        check_working_hours(&item.id, None, item.end_at(), rules, &mut violations);
    }

    violations.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| a.kind.cmp(&b.kind))
            .then_with(|| a.item_id.cmp(&b.item_id))
            .then_with(|| a.related_item_id.cmp(&b.related_item_id))
    });

    let report = build_report(violations);
    debug!(
        target: "app::conflicts",
        groups = index.group_count(),
        errors = report.summary.errors,
        warnings = report.summary.warnings,
        "conflict rules evaluated"
    );
    report
}

fn build_report(violations: Vec<Violation>) -> ConflictReport {
    let mut by_item: BTreeMap<String, Vec<Violation>> = BTreeMap::new();
    for violation in &violations {
        by_item
            .entry(violation.item_id.clone())
            .or_default()
            .push(violation.clone());
    }

    let errors = violations
        .iter()
        .filter(|violation| violation.severity == ViolationSeverity::Error)
        .count();
    let summary = ViolationSummary {
        errors,
        warnings: violations.len() - errors,
        affected_items: by_item.len(),
    };

    ConflictReport {
        violations,
        by_item,
        summary,
    }
}

fn detect_overlaps(group: &[TimedItem<'_>], violations: &mut Vec<Violation>) {
    for (idx, first) in group.iter().enumerate() {
        // Sorted by start: once one follower clears `first`, all later ones do.
        for second in &group[idx + 1..] {
            if second.start() >= first.end() {
                break;
            }
            let window_start = clock(second.start());
            let window_end = clock(first.end().min(second.end()));
            violations.push(overlap_violation(first, second, &window_start, &window_end));
            violations.push(overlap_violation(second, first, &window_start, &window_end));
        }
    }
}

fn overlap_violation(
    item: &TimedItem<'_>,
    other: &TimedItem<'_>,
    window_start: &str,
    window_end: &str,
) -> Violation {
    Violation::new(
        ViolationKind::Overlap,
        item.id(),
        format!(
            "Overlaps with '{}' ({}) between {} and {}",
            other.item.display_title(),
            other.id(),
            window_start,
            window_end
        ),
    )
    .with_related(other.id())
}

fn detect_impossible_timing(
    group: &[TimedItem<'_>],
    min_gap_minutes: i64,
    violations: &mut Vec<Violation>,
) {
    if min_gap_minutes <= 0 {
        return;
    }

    for pair in group.windows(2) {
        let (before, after) = (&pair[0], &pair[1]);
        if after.start() < before.end() {
            continue;
        }
        let gap = schedule_utils::duration_minutes(before.end(), after.start());
        if gap >= min_gap_minutes {
            continue;
        }

        violations.push(
            Violation::new(
                ViolationKind::ImpossibleTiming,
                before.id(),
                format!(
                    "No margin after: '{}' starts {} min after this ends (minimum {} min)",
                    after.item.display_title(),
                    gap,
                    min_gap_minutes
                ),
            )
            .with_related(after.id()),
        );
        violations.push(
            Violation::new(
                ViolationKind::ImpossibleTiming,
                after.id(),
                format!(
                    "No margin before: starts {} min after '{}' ends (minimum {} min)",
                    gap,
                    before.item.display_title(),
                    min_gap_minutes
                ),
            )
            .with_related(before.id()),
        );
    }
}

fn detect_daily_overload(
    key: &GroupKey,
    group: &[TimedItem<'_>],
    limit_minutes: f64,
    violations: &mut Vec<Violation>,
) {
    let total: i64 = group.iter().map(TimedItem::duration_minutes).sum();
    let total = total as f64;
    if total <= limit_minutes {
        return;
    }

    let message = format!(
        "Daily load of {} for {} on {} exceeds the {} limit (+{})",
        schedule_utils::format_hours(total),
        key.assignee,
        key.day,
        schedule_utils::format_hours(limit_minutes),
        schedule_utils::format_hours(total - limit_minutes)
    );
    for timed in group {
        violations.push(Violation::new(
            ViolationKind::DailyOverload,
            timed.id(),
            message.clone(),
        ));
    }
}

fn check_working_hours(
    item_id: &str,
    start: Option<DateTime<FixedOffset>>,
    end: Option<DateTime<FixedOffset>>,
    rules: &ConflictRules,
    violations: &mut Vec<Violation>,
) {
    let Some(breach) = schedule_utils::working_hours_breach(
        start,
        end,
        rules.working_hours_start,
        rules.working_hours_end,
    ) else {
        return;
    };

    let opens = schedule_utils::format_clock(rules.working_hours_start as i64 * 60);
    let closes = schedule_utils::format_clock(rules.working_hours_end as i64 * 60);
    let starts = start.map(clock).unwrap_or_default();
    let ends = end.map(|value| end_label(start, value)).unwrap_or_default();

    let message = match (breach.starts_before, breach.ends_after) {
        (true, true) => format!(
            "Runs outside working hours: starts at {starts} before {opens} and ends at {ends} after {closes}"
        ),
        (true, false) => format!("Starts at {starts}, before working hours begin at {opens}"),
        _ => format!("Ends at {ends}, after working hours end at {closes}"),
    };

    violations.push(Violation::new(ViolationKind::OutsideHours, item_id, message));
}

fn clock(value: DateTime<FixedOffset>) -> String {
    schedule_utils::format_clock(schedule_utils::minutes_from_midnight(value))
}

fn end_label(start: Option<DateTime<FixedOffset>>, end: DateTime<FixedOffset>) -> String {
    match start {
        Some(start) if start.date_naive() != end.date_naive() => {
            format!("{} on {}", clock(end), end.date_naive())
        }
        _ => clock(end),
    }
}
