use serde::{Deserialize, Serialize};

const DEFAULT_WORKING_HOURS_START: u32 = 9;
const DEFAULT_WORKING_HOURS_END: u32 = 18;

/// Thresholds for the conflict rules. Every field falls back to its default
/// when omitted from a partial JSON override.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ConflictRules {
    pub daily_hours_limit: f64,
    pub working_hours_start: u32,
    pub working_hours_end: u32,
    pub min_gap_minutes: i64,
}

impl Default for ConflictRules {
    fn default() -> Self {
        Self {
            daily_hours_limit: 8.0,
            working_hours_start: DEFAULT_WORKING_HOURS_START,
            working_hours_end: DEFAULT_WORKING_HOURS_END,
            min_gap_minutes: 0,
        }
    }
}

impl ConflictRules {
    pub fn daily_limit_minutes(&self) -> f64 {
        self.daily_hours_limit * 60.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkloadThresholds {
    pub tasks_per_day_overload: usize,
    pub high_priority_per_day_critical: usize,
    pub tasks_per_user_overload: usize,
}

impl Default for WorkloadThresholds {
    fn default() -> Self {
        Self {
            tasks_per_day_overload: 8,
            high_priority_per_day_critical: 4,
            tasks_per_user_overload: 12,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SuggestionSettings {
    pub min_gap_minutes: i64,
    pub load_imbalance_threshold_minutes: i64,
    pub working_hours_start: u32,
    pub working_hours_end: u32,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            min_gap_minutes: 15,
            load_imbalance_threshold_minutes: 120,
            working_hours_start: DEFAULT_WORKING_HOURS_START,
            working_hours_end: DEFAULT_WORKING_HOURS_END,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RedistributionSettings {
    pub max_suggestions: usize,
    pub load_window_days: i64,
}

impl Default for RedistributionSettings {
    fn default() -> Self {
        Self {
            max_suggestions: 5,
            load_window_days: 14,
        }
    }
}

/// Per-call settings for a full advisory run. Passed by value on every call;
/// nothing here is process-wide.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvisorSettings {
    pub conflicts: ConflictRules,
    pub workload: WorkloadThresholds,
    pub suggestions: SuggestionSettings,
    pub redistribution: RedistributionSettings,
}
