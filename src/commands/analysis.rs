use serde::{Deserialize, Serialize};

use crate::models::item::ScheduledItem;
use crate::models::redistribution::RedistributionMove;
use crate::models::report::AdvisoryReport;
use crate::models::settings::AdvisorSettings;
use crate::models::suggestion::Suggestion;
use crate::models::violation::ConflictReport;
use crate::models::workload::WorkloadReport;
use crate::services::{
    advisory_service, conflict_service, redistribution_service, schedule_utils,
    settings_service, suggestion_service, workload_service,
};

use super::CommandResult;

/// Request body shared by every analysis command.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPayload {
    #[serde(default)]
    pub items: Vec<ScheduledItem>,
    #[serde(default)]
    pub settings: Option<AdvisorSettings>,
}

impl AnalysisPayload {
    pub fn new(items: Vec<ScheduledItem>, settings: Option<AdvisorSettings>) -> Self {
        Self { items, settings }
    }

    fn into_parts(self) -> CommandResult<(Vec<ScheduledItem>, AdvisorSettings)> {
        let settings = self.settings.unwrap_or_default();
        settings_service::validate_settings(&settings)?;
        Ok((self.items, settings))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SnappedTime {
    pub minutes: u32,
    pub clock: String,
}

pub fn analysis_conflicts_evaluate(payload: AnalysisPayload) -> CommandResult<ConflictReport> {
    let (items, settings) = payload.into_parts()?;
    Ok(conflict_service::evaluate_conflicts(
        &items,
        &settings.conflicts,
    ))
}

pub fn analysis_workload_fetch(payload: AnalysisPayload) -> CommandResult<WorkloadReport> {
    let (items, settings) = payload.into_parts()?;
    Ok(workload_service::analyze_workload(&items, &settings.workload))
}

pub fn analysis_suggestions_generate(payload: AnalysisPayload) -> CommandResult<Vec<Suggestion>> {
    let (items, settings) = payload.into_parts()?;
    Ok(suggestion_service::generate_suggestions(
        &items,
        &settings.suggestions,
    ))
}

/// Plans moves off the days the workload analysis flags under the same
/// settings.
pub fn analysis_redistribution_plan(
    payload: AnalysisPayload,
) -> CommandResult<Vec<RedistributionMove>> {
    let (items, settings) = payload.into_parts()?;
    let workload = workload_service::analyze_workload(&items, &settings.workload);
    Ok(redistribution_service::plan_redistribution(
        &items,
        &workload,
        &settings.redistribution,
    ))
}

pub fn analysis_run_all(payload: AnalysisPayload) -> CommandResult<AdvisoryReport> {
    let (items, settings) = payload.into_parts()?;
    Ok(advisory_service::analyze(&items, &settings))
}

pub fn analysis_snap_minutes(minutes_from_midnight: f64) -> CommandResult<SnappedTime> {
    let minutes = schedule_utils::snap_minutes(minutes_from_midnight);
    Ok(SnappedTime {
        minutes,
        clock: schedule_utils::format_clock(i64::from(minutes)),
    })
}
