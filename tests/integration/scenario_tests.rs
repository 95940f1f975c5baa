use chrono::NaiveDate;
use schedule_advisor_lib::models::item::{ItemPriority, ItemStatus, ScheduledItem};
use schedule_advisor_lib::models::settings::{
    ConflictRules, RedistributionSettings, SuggestionSettings, WorkloadThresholds,
};
use schedule_advisor_lib::models::suggestion::SuggestionKind;
use schedule_advisor_lib::models::violation::{ViolationKind, ViolationSeverity};
use schedule_advisor_lib::services::conflict_service::evaluate_conflicts;
use schedule_advisor_lib::services::redistribution_service::plan_redistribution;
use schedule_advisor_lib::services::suggestion_service::generate_suggestions;
use schedule_advisor_lib::services::workload_service::analyze_workload;

fn task(id: &str, assignee: &str, day: &str, start: &str, end: &str) -> ScheduledItem {
    ScheduledItem {
        id: id.to_string(),
        title: format!("Task {id}"),
        start: Some(format!("{day}T{start}:00Z")),
        end: Some(format!("{day}T{end}:00Z")),
        assignee: Some(assignee.to_string()),
        status: ItemStatus::Pending,
        priority: ItemPriority::Medium,
        client_label: None,
    }
}

#[test]
fn test_overlapping_items_are_both_flagged() {
    let items = vec![
        task("item1", "ana", "2025-06-02", "09:00", "10:00"),
        task("item2", "ana", "2025-06-02", "09:30", "10:30"),
    ];

    let report = evaluate_conflicts(&items, &ConflictRules::default());

    for id in ["item1", "item2"] {
        let overlaps: Vec<_> = report
            .for_item(id)
            .iter()
            .filter(|violation| violation.kind == ViolationKind::Overlap)
            .collect();
        assert_eq!(overlaps.len(), 1, "{id} should carry one overlap");
        assert_eq!(overlaps[0].severity, ViolationSeverity::Error);
    }
    assert_eq!(
        report.for_item("item1")[0].related_item_id.as_deref(),
        Some("item2")
    );
    assert!(report.has_errors());
    assert_eq!(report.summary.errors, 2);
}

#[test]
fn test_nine_hour_day_overloads_every_item() {
    let items = vec![
        task("m1", "ana", "2025-06-03", "09:00", "12:00"),
        task("m2", "ana", "2025-06-03", "12:00", "15:00"),
        task("m3", "ana", "2025-06-03", "15:00", "18:00"),
    ];

    let report = evaluate_conflicts(&items, &ConflictRules::default());

    let overloads: Vec<_> = report
        .violations
        .iter()
        .filter(|violation| violation.kind == ViolationKind::DailyOverload)
        .collect();
    assert_eq!(overloads.len(), 3);
    assert!(overloads
        .iter()
        .all(|violation| violation.message.contains("+1.0h")));
    assert!(overloads
        .iter()
        .all(|violation| violation.severity == ViolationSeverity::Warning));
    assert!(!report.has_errors());
}

#[test]
fn test_early_item_breaks_working_hours() {
    let items = vec![task("early", "ana", "2025-06-04", "07:00", "08:00")];

    let report = evaluate_conflicts(&items, &ConflictRules::default());

    assert_eq!(report.violations.len(), 1);
    let violation = &report.violations[0];
    assert_eq!(violation.kind, ViolationKind::OutsideHours);
    assert_eq!(violation.item_id, "early");
    assert!(violation.message.contains("09:00"));
}

#[test]
fn test_low_priority_item_moves_off_saturated_day() {
    let mut items: Vec<ScheduledItem> = (0..8)
        .map(|i| {
            let mut item = task(
                &format!("x{i}"),
                "ana",
                "2025-06-10",
                &format!("{:02}:00", 9 + i),
                &format!("{:02}:30", 9 + i),
            );
            item.priority = ItemPriority::High;
            item
        })
        .collect();
    let mut low = task("x-low", "ana", "2025-06-10", "17:30", "17:45");
    low.priority = ItemPriority::Low;
    items.push(low);
    for i in 0..3 {
        items.push(task(
            &format!("w{i}"),
            "ana",
            "2025-06-09",
            &format!("{:02}:00", 9 + i),
            &format!("{:02}:30", 9 + i),
        ));
    }
    items.push(task("y1", "ana", "2025-06-11", "09:00", "10:00"));
    items.push(task("y2", "ana", "2025-06-11", "11:00", "12:00"));

    let workload = analyze_workload(&items, &WorkloadThresholds::default());
    let day_x = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
    let day_y = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();
    assert!(workload.is_day_overloaded(day_x));
    assert!(!workload.is_day_overloaded(day_y));

    let moves = plan_redistribution(&items, &workload, &RedistributionSettings::default());

    let low_move = moves
        .iter()
        .find(|mv| mv.item_id == "x-low")
        .expect("low priority item should be moved");
    assert_eq!(low_move.from_day, day_x);
    assert_eq!(low_move.to_day, day_y);
    assert_eq!(moves[0].item_id, "x-low");
    assert!(moves.iter().all(|mv| mv.to_day == day_y));
}

#[test]
fn test_lone_overloaded_day_spills_onto_empty_neighbour() {
    let mut items: Vec<ScheduledItem> = (0..8)
        .map(|i| {
            task(
                &format!("p{i}"),
                "ana",
                "2025-06-10",
                &format!("{:02}:00", 9 + i),
                &format!("{:02}:30", 9 + i),
            )
        })
        .collect();
    let mut low = task("p-low", "ana", "2025-06-10", "17:30", "17:45");
    low.priority = ItemPriority::Low;
    items.push(low);

    let workload = analyze_workload(&items, &WorkloadThresholds::default());
    let moves = plan_redistribution(&items, &workload, &RedistributionSettings::default());

    assert_eq!(moves[0].item_id, "p-low");
    assert_eq!(moves[0].to_day, NaiveDate::from_ymd_opt(2025, 6, 9).unwrap());
}

#[test]
fn test_uneven_assignees_get_one_balance_suggestion() {
    let items = vec![
        task("heavy", "ana", "2025-06-05", "09:00", "18:00"),
        task("light", "ben", "2025-06-05", "09:00", "11:00"),
    ];

    let suggestions = generate_suggestions(&items, &SuggestionSettings::default());

    let balance: Vec<_> = suggestions
        .iter()
        .filter(|suggestion| suggestion.kind == SuggestionKind::BalanceLoad)
        .collect();
    assert_eq!(balance.len(), 1);
    assert_eq!(balance[0].time_saved_minutes, 210);
    assert_eq!(balance[0].affected_item_ids, vec!["heavy", "light"]);
    assert!(balance[0].description.contains("ana"));
    assert!(balance[0].description.contains("ben"));
}
