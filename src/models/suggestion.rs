use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuggestionKind {
    FillGap,
    BalanceLoad,
    GroupTasks,
    Reorder,
    BetterSchedule,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::FillGap => "FILL_GAP",
            SuggestionKind::BalanceLoad => "BALANCE_LOAD",
            SuggestionKind::GroupTasks => "GROUP_TASKS",
            SuggestionKind::Reorder => "REORDER",
            SuggestionKind::BetterSchedule => "BETTER_SCHEDULE",
        }
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionDifficulty {
    Low,
    Medium,
    High,
}

impl SuggestionDifficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionDifficulty::Low => "low",
            SuggestionDifficulty::Medium => "medium",
            SuggestionDifficulty::High => "high",
        }
    }
}

impl fmt::Display for SuggestionDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub title: String,
    pub description: String,
    pub affected_item_ids: Vec<String>,
    pub time_saved_minutes: i64,
    pub difficulty: SuggestionDifficulty,
    pub confidence: f64,
}
