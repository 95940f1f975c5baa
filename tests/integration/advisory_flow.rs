use schedule_advisor_lib::models::item::ScheduledItem;
use schedule_advisor_lib::models::settings::AdvisorSettings;
use schedule_advisor_lib::models::suggestion::SuggestionKind;
use schedule_advisor_lib::models::violation::ViolationKind;
use schedule_advisor_lib::services::redistribution_service::move_to_update;
use schedule_advisor_lib::{analyze, analyze_checked};
use serde_json::{json, Value};

fn snapshot() -> Vec<ScheduledItem> {
    let mut raw = vec![
        json!({ "id": "standup", "title": "Standup", "start": "2025-04-07T09:00:00+02:00",
                "end": "2025-04-07T09:15:00+02:00", "assignedTo": "ana", "priority": "MEDIUM" }),
        json!({ "id": "review", "title": "Code review", "start": "2025-04-07T09:10:00+02:00",
                "end": "2025-04-07T10:00:00+02:00", "assignedTo": "ana", "priority": "HIGH" }),
        json!({ "id": "visit-1", "title": "Acme visit", "start": "2025-04-07T11:00:00+02:00",
                "end": "2025-04-07T11:30:00+02:00", "assignedTo": "ana", "lead": "Acme" }),
        json!({ "id": "visit-2", "title": "Acme follow-up", "start": "2025-04-07T15:00:00+02:00",
                "end": "2025-04-07T15:30:00+02:00", "assignedTo": "ana", "lead": "Acme" }),
        json!({ "id": "dropped", "title": "Dropped", "start": "2025-04-07T09:00:00+02:00",
                "end": "2025-04-07T12:00:00+02:00", "assignedTo": "ana", "status": "CANCELLED" }),
        json!({ "id": "late", "title": "Late call", "start": "2025-04-08T19:00:00+02:00",
                "end": "2025-04-08T19:30:00+02:00", "assignedTo": "ben" }),
        json!({ "id": "inbox", "title": "Unscheduled" }),
    ];
    for i in 0..8 {
        raw.push(json!({
            "id": format!("batch-{i}"),
            "title": format!("Batch {i}"),
            "start": format!("2025-04-10T{:02}:00:00+02:00", 9 + i),
            "end": format!("2025-04-10T{:02}:20:00+02:00", 9 + i),
            "priority": if i == 0 { "LOW" } else { "MEDIUM" },
        }));
    }
    serde_json::from_value(Value::Array(raw)).unwrap()
}

#[test]
fn test_full_pass_over_mixed_snapshot() {
    let items = snapshot();
    let report = analyze_checked(&items, &AdvisorSettings::default()).unwrap();

    assert_eq!(report.item_count, items.len());

    let overlap_ids: Vec<&str> = report
        .conflicts
        .violations
        .iter()
        .filter(|violation| violation.kind == ViolationKind::Overlap)
        .map(|violation| violation.item_id.as_str())
        .collect();
    assert_eq!(overlap_ids, vec!["review", "standup"]);
    assert!(report.conflicts.for_item("dropped").is_empty());
    assert!(report.conflicts.for_item("inbox").is_empty());
    assert_eq!(
        report.conflicts.for_item("late")[0].kind,
        ViolationKind::OutsideHours
    );

    assert_eq!(report.workload.overloaded_days.len(), 1);
    assert_eq!(
        report.workload.overloaded_days[0].date.to_string(),
        "2025-04-10"
    );

    assert!(report
        .suggestions
        .iter()
        .any(|suggestion| suggestion.kind == SuggestionKind::GroupTasks
            && suggestion.affected_item_ids == vec!["visit-1", "visit-2"]));
    assert!(report
        .suggestions
        .iter()
        .any(|suggestion| suggestion.kind == SuggestionKind::BetterSchedule
            && suggestion.affected_item_ids == vec!["late"]));
    for pair in report.suggestions.windows(2) {
        assert!(pair[0].time_saved_minutes >= pair[1].time_saved_minutes);
    }

    assert!(!report.moves.is_empty());
    assert_eq!(report.moves[0].item_id, "batch-0");
    assert!(report.moves.len() <= 5);
}

#[test]
fn test_repeated_runs_are_identical() {
    let items = snapshot();
    let settings = AdvisorSettings::default();

    let first = analyze(&items, &settings);
    let second = analyze(&items, &settings);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_report_serialises_with_camel_case_keys() {
    let report = analyze(&snapshot(), &AdvisorSettings::default());
    let value = serde_json::to_value(&report).unwrap();

    assert!(value.get("itemCount").is_some());
    let violation = &value["conflicts"]["violations"][0];
    assert!(violation.get("type").is_some());
    assert!(violation.get("itemId").is_some());
    assert_eq!(violation["severity"], "error");

    let suggestion = &value["suggestions"][0];
    assert!(suggestion.get("affectedItemIds").is_some());
    assert!(suggestion.get("timeSavedMinutes").is_some());

    let day = &value["workload"]["overloadedDays"][0];
    assert_eq!(day["date"], "2025-04-10");
    assert_eq!(value["moves"][0]["fromDay"], "2025-04-10");
}

#[test]
fn test_accepted_move_becomes_item_update() {
    let items = snapshot();
    let report = analyze(&items, &AdvisorSettings::default());
    let mv = &report.moves[0];
    let item = items.iter().find(|item| item.id == mv.item_id).unwrap();

    let update = move_to_update(mv, item).unwrap();

    let start = update.start.unwrap();
    assert!(start.starts_with(&mv.to_day.to_string()));
    assert!(start.ends_with("+02:00"));
    assert!(update.end.is_some());
    assert!(update.assigned_to.is_none());
}
