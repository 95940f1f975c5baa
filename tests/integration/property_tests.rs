use std::collections::{BTreeMap, HashSet};

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use schedule_advisor_lib::analyze;
use schedule_advisor_lib::models::item::{ItemPriority, ItemStatus, ScheduledItem};
use schedule_advisor_lib::models::settings::{
    AdvisorSettings, ConflictRules, RedistributionSettings, WorkloadThresholds,
};
use schedule_advisor_lib::models::violation::ViolationKind;
use schedule_advisor_lib::services::conflict_service::evaluate_conflicts;
use schedule_advisor_lib::services::redistribution_service::plan_redistribution;
use schedule_advisor_lib::services::schedule_utils::{
    snap_minutes, GRID_STEP_MINUTES, LAST_GRID_MINUTE,
};
use schedule_advisor_lib::services::workload_service::analyze_workload;

type RawItem = (u32, u32, u32, Option<usize>, u8, u8, Option<usize>);

const ASSIGNEES: [&str; 3] = ["ana", "ben", "caro"];
const CLIENTS: [&str; 2] = ["Acme", "Globex"];

fn build_items(raw: Vec<RawItem>) -> Vec<ScheduledItem> {
    raw.into_iter()
        .enumerate()
        .map(|(idx, (day, start, duration, assignee, status, priority, client))| {
            let start_minute = start.min(23 * 60 + 45);
            let end_minute = (start_minute + duration).min(23 * 60 + 59);
            ScheduledItem {
                id: format!("item-{idx:03}"),
                title: format!("Item {idx}"),
                start: Some(format!(
                    "2025-05-{day:02}T{:02}:{:02}:00Z",
                    start_minute / 60,
                    start_minute % 60
                )),
                end: Some(format!(
                    "2025-05-{day:02}T{:02}:{:02}:00Z",
                    end_minute / 60,
                    end_minute % 60
                )),
                assignee: assignee.map(|i| ASSIGNEES[i].to_string()),
                status: match status {
                    0 => ItemStatus::Done,
                    1 => ItemStatus::Cancelled,
                    _ => ItemStatus::Pending,
                },
                priority: match priority {
                    0 => ItemPriority::Low,
                    1 => ItemPriority::Medium,
                    _ => ItemPriority::High,
                },
                client_label: client.map(|i| CLIENTS[i].to_string()),
            }
        })
        .collect()
}

fn items_strategy() -> impl Strategy<Value = Vec<ScheduledItem>> {
    prop::collection::vec(
        (
            1u32..=10,
            360u32..1260,
            0u32..240,
            prop::option::of(0usize..3),
            0u8..6,
            0u8..3,
            prop::option::of(0usize..2),
        ),
        0..40,
    )
    .prop_map(build_items)
}

proptest! {
    #[test]
    fn prop_analysis_is_deterministic(items in items_strategy()) {
        let settings = AdvisorSettings::default();
        prop_assert_eq!(analyze(&items, &settings), analyze(&items, &settings));
    }

    #[test]
    fn prop_input_order_does_not_matter(
        (items, shuffled) in items_strategy()
            .prop_flat_map(|items| (Just(items.clone()), Just(items).prop_shuffle()))
    ) {
        let settings = AdvisorSettings::default();
        prop_assert_eq!(analyze(&items, &settings), analyze(&shuffled, &settings));
    }

    #[test]
    fn prop_overlaps_are_symmetric(items in items_strategy(), min_gap in 0i64..30) {
        let rules = ConflictRules { min_gap_minutes: min_gap, ..ConflictRules::default() };
        let report = evaluate_conflicts(&items, &rules);

        let pairs: HashSet<(&str, &str)> = report
            .violations
            .iter()
            .filter(|violation| violation.kind == ViolationKind::Overlap)
            .filter_map(|violation| {
                violation
                    .related_item_id
                    .as_deref()
                    .map(|related| (violation.item_id.as_str(), related))
            })
            .collect();
        for (item, related) in &pairs {
            prop_assert!(pairs.contains(&(*related, *item)));
        }
    }

    #[test]
    fn prop_workload_is_stable_and_justified(items in items_strategy()) {
        let thresholds = WorkloadThresholds::default();
        let first = analyze_workload(&items, &thresholds);
        let second = analyze_workload(&items, &thresholds);
        prop_assert_eq!(&first, &second);

        for day in &first.overloaded_days {
            prop_assert!(
                day.total >= thresholds.tasks_per_day_overload
                    || day.high_priority_count >= thresholds.high_priority_per_day_critical
            );
        }
        for pair in first.overloaded_users.windows(2) {
            prop_assert!(pair[0].total >= pair[1].total);
        }
    }

    #[test]
    fn prop_suggestions_are_ranked(items in items_strategy()) {
        let report = analyze(&items, &AdvisorSettings::default());
        for pair in report.suggestions.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.time_saved_minutes >= b.time_saved_minutes);
            if a.time_saved_minutes == b.time_saved_minutes {
                prop_assert!(a.confidence >= b.confidence);
            }
        }
        for suggestion in &report.suggestions {
            prop_assert!((0.0..=1.0).contains(&suggestion.confidence));
            prop_assert!(suggestion.time_saved_minutes >= 0);
        }
    }

    #[test]
    fn prop_redistribution_respects_limits(
        items in items_strategy(),
        max_suggestions in 0usize..6,
        load_window_days in 0i64..5,
    ) {
        let thresholds = WorkloadThresholds {
            tasks_per_day_overload: 3,
            ..WorkloadThresholds::default()
        };
        let settings = RedistributionSettings { max_suggestions, load_window_days };
        let workload = analyze_workload(&items, &thresholds);
        let moves = plan_redistribution(&items, &workload, &settings);

        prop_assert!(moves.len() <= max_suggestions);

        let mut loads: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for item in items.iter().filter(|item| item.is_active()) {
            if let Some(start) = item.start_at() {
                *loads.entry(start.date_naive()).or_default() += 1;
            }
        }
        let load = |day: NaiveDate| loads.get(&day).copied().unwrap_or(0);
        let window = Days::new(load_window_days.unsigned_abs());

        let mut seen = HashSet::new();
        for mv in &moves {
            prop_assert!(seen.insert(mv.item_id.clone()));
            prop_assert!(workload.is_day_overloaded(mv.from_day));
            prop_assert!(mv.day_delta() != 0);
            let (first, last) = (loads.keys().next().unwrap(), loads.keys().next_back().unwrap());
            prop_assert!(mv.to_day >= *first - window);
            prop_assert!(mv.to_day <= *last + window);
            prop_assert!(load(mv.to_day) < load(mv.from_day));

            let item = items.iter().find(|item| item.id == mv.item_id).unwrap();
            prop_assert_eq!(item.status, ItemStatus::Pending);
        }
    }

    #[test]
    fn prop_snapped_minutes_sit_on_grid(minutes in -100.0f64..2000.0) {
        let snapped = snap_minutes(minutes);
        prop_assert_eq!(snapped % GRID_STEP_MINUTES, 0);
        prop_assert!(snapped <= LAST_GRID_MINUTE);
        let clamped = minutes.clamp(0.0, LAST_GRID_MINUTE as f64);
        prop_assert!((snapped as f64 - clamped).abs() <= GRID_STEP_MINUTES as f64 / 2.0);
    }
}
