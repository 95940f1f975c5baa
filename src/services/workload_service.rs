use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::models::item::{AssigneeKey, ItemPriority, ScheduledItem};
use crate::models::settings::WorkloadThresholds;
use crate::models::workload::{OverloadedDay, OverloadedUser, WorkloadReport};
use crate::services::interval_index::IntervalIndex;

#[derive(Debug, Default, Clone, Copy)]
struct DailyLoad {
    total: usize,
    high_priority: usize,
}

/// Flags days and assignees whose item counts reach the configured
/// thresholds. Purely informational.
pub fn analyze_workload(items: &[ScheduledItem], thresholds: &WorkloadThresholds) -> WorkloadReport {
    let index = IntervalIndex::build(items);
    analyze_index(&index, thresholds)
}

pub fn analyze_index(index: &IntervalIndex<'_>, thresholds: &WorkloadThresholds) -> WorkloadReport {
    let mut days: BTreeMap<NaiveDate, DailyLoad> = BTreeMap::new();
    // Per-user totals cover the whole snapshot, unscheduled items included.
    let mut users: BTreeMap<AssigneeKey, usize> = BTreeMap::new();

    for (key, group) in index.groups() {
        let load = days.entry(key.day).or_default();
        load.total += group.len();
        load.high_priority += group
            .iter()
            .filter(|timed| timed.item.priority == ItemPriority::High)
            .count();

        if !key.assignee.is_unassigned() {
            *users.entry(key.assignee.clone()).or_default() += group.len();
        }
    }
    for item in index.unscheduled() {
        let assignee = item.assignee_key();
        if !assignee.is_unassigned() {
            *users.entry(assignee).or_default() += 1;
        }
    }

    let overloaded_days: Vec<OverloadedDay> = days
        .into_iter()
        .filter_map(|(date, load)| day_overload(date, load, thresholds))
        .collect();

    let mut overloaded_users: Vec<OverloadedUser> = users
        .into_iter()
        .filter(|(_, total)| *total >= thresholds.tasks_per_user_overload)
        .map(|(assignee, total)| OverloadedUser {
            assignee_id: assignee.to_string(),
            total,
            reason: format!(
                "{} tasks assigned (threshold {})",
                total, thresholds.tasks_per_user_overload
            ),
        })
        .collect();
    overloaded_users.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.assignee_id.cmp(&b.assignee_id))
    });

    if !overloaded_days.is_empty() || !overloaded_users.is_empty() {
        info!(
            target: "app::workload",
            overloaded_days = overloaded_days.len(),
            overloaded_users = overloaded_users.len(),
            "workload saturation detected"
        );
    } else {
        debug!(target: "app::workload", "workload within thresholds");
    }

    WorkloadReport {
        overloaded_days,
        overloaded_users,
    }
}

fn day_overload(
    date: NaiveDate,
    load: DailyLoad,
    thresholds: &WorkloadThresholds,
) -> Option<OverloadedDay> {
    let mut clauses = Vec::new();
    if load.total >= thresholds.tasks_per_day_overload {
        clauses.push(format!(
            "{} tasks scheduled (threshold {})",
            load.total, thresholds.tasks_per_day_overload
        ));
    }
    if load.high_priority >= thresholds.high_priority_per_day_critical {
        clauses.push(format!(
            "{} high-priority tasks (critical at {})",
            load.high_priority, thresholds.high_priority_per_day_critical
        ));
    }
    if clauses.is_empty() {
        return None;
    }

    Some(OverloadedDay {
        date,
        total: load.total,
        high_priority_count: load.high_priority,
        reason: clauses.join("; "),
    })
}
