use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{Days, NaiveDate};
use serde_json::json;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::item::{ItemUpdate, ScheduledItem};
use crate::models::redistribution::RedistributionMove;
use crate::models::settings::RedistributionSettings;
use crate::models::workload::{OverloadedDay, WorkloadReport};
use crate::services::interval_index::{IntervalIndex, TimedItem};
use crate::services::schedule_utils;

/// Day loads captured once per planning pass. Moves proposed in the same
/// batch never update them.
struct LoadSnapshot {
    loads: BTreeMap<NaiveDate, usize>,
    overloaded: BTreeSet<NaiveDate>,
    /// Candidate range: the snapshot's date span widened by the load window.
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl LoadSnapshot {
    fn new(
        loads: BTreeMap<NaiveDate, usize>,
        overloaded: BTreeSet<NaiveDate>,
        span: (NaiveDate, NaiveDate),
        window_days: u64,
    ) -> Self {
        let (first, last) = span;
        Self {
            loads,
            overloaded,
            first_day: first
                .checked_sub_days(Days::new(window_days))
                .unwrap_or(NaiveDate::MIN),
            last_day: last
                .checked_add_days(Days::new(window_days))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    fn load(&self, day: NaiveDate) -> usize {
        self.loads.get(&day).copied().unwrap_or(0)
    }

    /// Nearest day in the candidate range whose load is strictly lower than
    /// `source`'s. Empty days count with load 0. Ties go to the lighter day,
    /// then a day that is not overloaded, then the earlier date.
    fn nearest_lighter_day(&self, source: NaiveDate) -> Option<NaiveDate> {
        let source_load = self.load(source);
        self.first_day
            .iter_days()
            .take_while(|day| *day <= self.last_day)
            .filter(|day| *day != source)
            .map(|day| (day, self.load(day)))
            .filter(|(_, load)| *load < source_load)
            .map(|(day, load)| {
                let distance = day.signed_duration_since(source).num_days().abs();
                (distance, load, self.overloaded.contains(&day), day)
            })
            .min()
            .map(|(.., day)| day)
    }
}

/// Proposes moves off the days flagged in `workload`, lowest priority first.
pub fn plan_redistribution(
    items: &[ScheduledItem],
    workload: &WorkloadReport,
    settings: &RedistributionSettings,
) -> Vec<RedistributionMove> {
    let index = IntervalIndex::build(items);
    plan_from_index(&index, &workload.overloaded_days, settings)
}

pub fn plan_from_index(
    index: &IntervalIndex<'_>,
    overloaded_days: &[OverloadedDay],
    settings: &RedistributionSettings,
) -> Vec<RedistributionMove> {
    let mut moves = Vec::new();
    if settings.max_suggestions == 0 || overloaded_days.is_empty() {
        return moves;
    }

    let Some(span) = index.day_span() else {
        return moves;
    };
    let by_day = index.by_day();
    let snapshot = LoadSnapshot::new(
        by_day
            .iter()
            .map(|(day, items)| (*day, items.len()))
            .collect(),
        overloaded_days.iter().map(|day| day.date).collect(),
        span,
        settings.load_window_days.max(0).unsigned_abs(),
    );
    let mut suggested: HashSet<&str> = HashSet::new();

    for source in &snapshot.overloaded {
        let Some(day_items) = by_day.get(source) else {
            continue;
        };
        let Some(target) = snapshot.nearest_lighter_day(*source) else {
            debug!(target: "app::redistribution", day = %source, "no lighter day in window");
            continue;
        };

        let mut candidates: Vec<&TimedItem<'_>> = day_items
            .iter()
            .copied()
            .filter(|timed| timed.item.is_movable())
            .collect();
        candidates.sort_by(|a, b| {
            a.item
                .priority
                .cmp(&b.item.priority)
                .then_with(|| a.start().cmp(&b.start()))
                .then_with(|| a.id().cmp(b.id()))
        });

        for timed in candidates {
            if moves.len() >= settings.max_suggestions {
                break;
            }
            if !suggested.insert(timed.id()) {
                continue;
            }
            moves.push(RedistributionMove {
                item_id: timed.id().to_string(),
                from_day: *source,
                to_day: target,
                reason: format!(
                    "{} carries {} tasks; {} carries {}. Moving this {} priority item to the nearest lighter day eases the overload",
                    source,
                    snapshot.load(*source),
                    target,
                    snapshot.load(target),
                    timed.item.priority.as_str().to_lowercase()
                ),
            });
        }
    }

    if !moves.is_empty() {
        info!(
            target: "app::redistribution",
            moves = moves.len(),
            overloaded_days = snapshot.overloaded.len(),
            "redistribution moves proposed"
        );
    }
    moves
}

/// Turns an accepted move into the partial update for the task store,
/// shifting start and end by the move's day delta.
pub fn move_to_update(mv: &RedistributionMove, item: &ScheduledItem) -> AppResult<ItemUpdate> {
    if mv.item_id != item.id {
        return Err(AppError::validation_with_details(
            "move does not belong to item",
            json!({ "moveItemId": mv.item_id, "itemId": item.id }),
        ));
    }
    let start = item.start_at().ok_or_else(|| {
        AppError::validation_with_details(
            "item has no start to shift",
            json!({ "itemId": item.id }),
        )
    })?;

    let delta = mv.day_delta();
    let shifted_start = schedule_utils::add_days(start, delta)?;
    let shifted_end = match item.end_at() {
        Some(end) => Some(schedule_utils::add_days(end, delta)?),
        None => None,
    };

    Ok(ItemUpdate {
        start: Some(schedule_utils::format_datetime(shifted_start)),
        end: shifted_end.map(schedule_utils::format_datetime),
        assigned_to: None,
    })
}
