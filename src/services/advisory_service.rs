use tracing::info;

use crate::error::AppResult;
use crate::models::item::ScheduledItem;
use crate::models::report::AdvisoryReport;
use crate::models::settings::AdvisorSettings;
use crate::services::interval_index::IntervalIndex;
use crate::services::{
    conflict_service, redistribution_service, settings_service, suggestion_service,
    workload_service,
};

/// Runs every analysis over one snapshot. The index is built once and shared;
/// redistribution consumes the workload result of the same pass.
pub fn analyze(items: &[ScheduledItem], settings: &AdvisorSettings) -> AdvisoryReport {
    let index = IntervalIndex::build(items);

    let conflicts = conflict_service::evaluate_index(&index, &settings.conflicts);
    let workload = workload_service::analyze_index(&index, &settings.workload);
    let suggestions = suggestion_service::generate_from_index(&index, &settings.suggestions);
    let moves = redistribution_service::plan_from_index(
        &index,
        &workload.overloaded_days,
        &settings.redistribution,
    );

    info!(
        target: "app::advisory",
        items = items.len(),
        violations = conflicts.violations.len(),
        overloaded_days = workload.overloaded_days.len(),
        suggestions = suggestions.len(),
        moves = moves.len(),
        "advisory pass complete"
    );

    AdvisoryReport {
        item_count: items.len(),
        conflicts,
        workload,
        suggestions,
        moves,
    }
}

/// Validates `settings` before running [`analyze`].
pub fn analyze_checked(
    items: &[ScheduledItem],
    settings: &AdvisorSettings,
) -> AppResult<AdvisoryReport> {
    settings_service::validate_settings(settings)?;
    Ok(analyze(items, settings))
}
