use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use tracing::debug;
use uuid::Uuid;

use crate::models::item::{AssigneeKey, ScheduledItem};
use crate::models::settings::SuggestionSettings;
use crate::models::suggestion::{Suggestion, SuggestionDifficulty, SuggestionKind};
use crate::services::interval_index::{GroupKey, IntervalIndex, TimedItem};
use crate::services::schedule_utils;

const FILL_GAP_CONFIDENCE: f64 = 1.0;
const REORDER_CONFIDENCE: f64 = 0.9;
const BALANCE_LOAD_CONFIDENCE: f64 = 0.85;
const GROUP_TASKS_CONFIDENCE: f64 = 0.8;
const BETTER_SCHEDULE_CONFIDENCE: f64 = 0.9;
const GROUPING_SAVING_PER_ITEM: i64 = 15;

const SUGGESTION_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2d8e_93a4_4b57_a0e2_5c7d_19f3_b842);

/// Produces every optimisation suggestion for the snapshot, best first.
pub fn generate_suggestions(
    items: &[ScheduledItem],
    settings: &SuggestionSettings,
) -> Vec<Suggestion> {
    let index = IntervalIndex::build(items);
    generate_from_index(&index, settings)
}

pub fn generate_from_index(
    index: &IntervalIndex<'_>,
    settings: &SuggestionSettings,
) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for (key, group) in index.groups() {
        suggest_gap_moves(key, group, settings, &mut suggestions);
    }
    suggest_load_balance(index, settings, &mut suggestions);
    suggest_client_grouping(index, &mut suggestions);
    suggest_working_hours(index, settings, &mut suggestions);

    rank_suggestions(&mut suggestions);
    debug!(
        target: "app::suggestions",
        count = suggestions.len(),
        "optimisation suggestions generated"
    );
    suggestions
}

/// Orders by time saved, then confidence, both descending. Kind and id break
/// the remaining ties so the order is total.
pub fn rank_suggestions(suggestions: &mut [Suggestion]) {
    suggestions.sort_by(|a, b| {
        b.time_saved_minutes
            .cmp(&a.time_saved_minutes)
            .then_with(|| {
                b.confidence
                    .partial_cmp(&a.confidence)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.kind.cmp(&b.kind))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Stable id derived from what the suggestion is about, not when it was made.
pub fn suggestion_id(kind: SuggestionKind, day: Option<NaiveDate>, affected: &[String]) -> String {
    let mut ids: Vec<&str> = affected.iter().map(String::as_str).collect();
    ids.sort_unstable();
    let day = day.map(|value| value.to_string()).unwrap_or_default();
    let name = format!("{}|{}|{}", kind.as_str(), day, ids.join(","));
    Uuid::new_v5(&SUGGESTION_NAMESPACE, name.as_bytes()).to_string()
}

#[allow(clippy::too_many_arguments)]
fn build_suggestion(
    kind: SuggestionKind,
    day: Option<NaiveDate>,
    title: String,
    description: String,
    affected_item_ids: Vec<String>,
    time_saved_minutes: i64,
    difficulty: SuggestionDifficulty,
    confidence: f64,
) -> Suggestion {
    Suggestion {
        id: suggestion_id(kind, day, &affected_item_ids),
        kind,
        title,
        description,
        affected_item_ids,
        time_saved_minutes,
        difficulty,
        confidence,
    }
}

fn suggest_gap_moves(
    key: &GroupKey,
    group: &[TimedItem<'_>],
    settings: &SuggestionSettings,
    suggestions: &mut Vec<Suggestion>,
) {
    for pair in group.windows(2) {
        let (before, after) = (&pair[0], &pair[1]);
        if after.start() <= before.end() {
            continue;
        }
        let gap = schedule_utils::duration_minutes(before.end(), after.start());
        let idle_from = clock(before.end());
        let idle_to = clock(after.start());

        if gap >= settings.min_gap_minutes {
            suggestions.push(build_suggestion(
                SuggestionKind::FillGap,
                Some(key.day),
                format!("Fill {gap}-minute gap"),
                format!(
                    "{} is idle from {} to {} on {} between '{}' and '{}'",
                    key.assignee,
                    idle_from,
                    idle_to,
                    key.day,
                    before.item.display_title(),
                    after.item.display_title()
                ),
                vec![before.id().to_string(), after.id().to_string()],
                gap,
                SuggestionDifficulty::Low,
                FILL_GAP_CONFIDENCE,
            ));
        }

        // FILL_GAP and REORDER may both describe the same pair; both are kept.
        let duration = after.duration_minutes();
        if duration > 0 && gap >= duration && after.item.is_movable() {
            suggestions.push(build_suggestion(
                SuggestionKind::Reorder,
                Some(key.day),
                format!("Move '{}' earlier", after.item.display_title()),
                format!(
                    "'{}' ({} min) fits in the {}-minute gap after '{}'; start it at {} instead of {}",
                    after.item.display_title(),
                    duration,
                    gap,
                    before.item.display_title(),
                    idle_from,
                    idle_to
                ),
                vec![after.id().to_string()],
                gap,
                SuggestionDifficulty::Medium,
                REORDER_CONFIDENCE,
            ));
        }
    }
}

#[derive(Default)]
struct DayBalance<'k> {
    minutes_by_assignee: BTreeMap<&'k AssigneeKey, i64>,
    item_ids: Vec<String>,
}

fn suggest_load_balance(
    index: &IntervalIndex<'_>,
    settings: &SuggestionSettings,
    suggestions: &mut Vec<Suggestion>,
) {
    let mut days: BTreeMap<NaiveDate, DayBalance<'_>> = BTreeMap::new();
    for (key, group) in index.groups() {
        let balance = days.entry(key.day).or_default();
        balance
            .item_ids
            .extend(group.iter().map(|timed| timed.id().to_string()));
        if !key.assignee.is_unassigned() {
            let minutes: i64 = group.iter().map(TimedItem::duration_minutes).sum();
            *balance.minutes_by_assignee.entry(&key.assignee).or_default() += minutes;
        }
    }

    for (day, balance) in days {
        let DayBalance {
            minutes_by_assignee,
            item_ids: mut affected,
        } = balance;
        if minutes_by_assignee.len() < 2 {
            continue;
        }

        let mut busiest: Option<(&AssigneeKey, i64)> = None;
        let mut lightest: Option<(&AssigneeKey, i64)> = None;
        for (&assignee, &minutes) in &minutes_by_assignee {
            if busiest.map_or(true, |(_, max)| minutes > max) {
                busiest = Some((assignee, minutes));
            }
            if lightest.map_or(true, |(_, min)| minutes < min) {
                lightest = Some((assignee, minutes));
            }
        }
        let (Some((busy, max)), Some((light, min))) = (busiest, lightest) else {
            continue;
        };

        let spread = max - min;
        if spread < settings.load_imbalance_threshold_minutes {
            continue;
        }

        affected.sort();
        affected.dedup();

        suggestions.push(build_suggestion(
            SuggestionKind::BalanceLoad,
            Some(day),
            format!("Balance load on {day}"),
            format!(
                "{} has {} scheduled while {} has {}; shifting work between them evens the day out",
                busy,
                schedule_utils::format_hours(max as f64),
                light,
                schedule_utils::format_hours(min as f64)
            ),
            affected,
            spread / 2,
            SuggestionDifficulty::Medium,
            BALANCE_LOAD_CONFIDENCE,
        ));
    }
}

fn suggest_client_grouping(index: &IntervalIndex<'_>, suggestions: &mut Vec<Suggestion>) {
    let mut by_label: BTreeMap<(NaiveDate, &str), Vec<&str>> = BTreeMap::new();
    for timed in index.timed_items() {
        if let Some(label) = timed.item.client_label() {
            by_label
                .entry((timed.day(), label))
                .or_default()
                .push(timed.id());
        }
    }

    for ((day, label), ids) in by_label {
        if ids.len() < 2 {
            continue;
        }
        let count = ids.len() as i64;
        let mut affected: Vec<String> = ids.into_iter().map(str::to_string).collect();
        affected.sort();

        suggestions.push(build_suggestion(
            SuggestionKind::GroupTasks,
            Some(day),
            format!("Group {count} tasks for {label} on {day}"),
            format!(
                "{count} separate visits for {label} on {day}; consolidating them into one block saves about {} min",
                GROUPING_SAVING_PER_ITEM * (count - 1)
            ),
            affected,
            GROUPING_SAVING_PER_ITEM * (count - 1),
            SuggestionDifficulty::Low,
            GROUP_TASKS_CONFIDENCE,
        ));
    }
}

fn suggest_working_hours(
    index: &IntervalIndex<'_>,
    settings: &SuggestionSettings,
    suggestions: &mut Vec<Suggestion>,
) {
    let candidates = index
        .timed_items()
        .map(|timed| (timed.item, Some(timed.start()), Some(timed.end())))
        .chain(
            index
                .unscheduled()
                .iter()
                .map(|item| (*item, None, item.end_at())),
        );

    for (item, start, end) in candidates {
        if !item.is_movable() {
            continue;
        }
        if schedule_utils::working_hours_breach(
            start,
            end,
            settings.working_hours_start,
            settings.working_hours_end,
        )
        .is_none()
        {
            continue;
        }

        let day = start.or(end).map(|value| value.date_naive());
        let placed = match (start, end) {
            (Some(start), Some(end)) => format!("Scheduled {}-{}", clock(start), clock(end)),
            (None, Some(end)) => format!("Ends at {}", clock(end)),
            _ => "Scheduled".to_string(),
        };

        suggestions.push(build_suggestion(
            SuggestionKind::BetterSchedule,
            day,
            format!("Move '{}' into working hours", item.display_title()),
            format!(
                "{}, outside working hours {}-{}",
                placed,
                schedule_utils::format_clock(settings.working_hours_start as i64 * 60),
                schedule_utils::format_clock(settings.working_hours_end as i64 * 60)
            ),
            vec![item.id.clone()],
            0,
            SuggestionDifficulty::Low,
            BETTER_SCHEDULE_CONFIDENCE,
        ));
    }
}

fn clock(value: DateTime<FixedOffset>) -> String {
    schedule_utils::format_clock(schedule_utils::minutes_from_midnight(value))
}
