use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    Overlap,
    ImpossibleTiming,
    OutsideHours,
    DailyOverload,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::Overlap => "OVERLAP",
            ViolationKind::ImpossibleTiming => "IMPOSSIBLE_TIMING",
            ViolationKind::OutsideHours => "OUTSIDE_HOURS",
            ViolationKind::DailyOverload => "DAILY_OVERLOAD",
        }
    }

    pub fn severity(&self) -> ViolationSeverity {
        match self {
            ViolationKind::Overlap | ViolationKind::ImpossibleTiming => ViolationSeverity::Error,
            ViolationKind::OutsideHours | ViolationKind::DailyOverload => {
                ViolationSeverity::Warning
            }
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors sort before warnings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ViolationSeverity {
    Error,
    Warning,
}

impl ViolationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationSeverity::Error => "error",
            ViolationSeverity::Warning => "warning",
        }
    }
}

impl fmt::Display for ViolationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    pub severity: ViolationSeverity,
    pub item_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_item_id: Option<String>,
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, item_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            item_id: item_id.into(),
            related_item_id: None,
            message: message.into(),
        }
    }

    pub fn with_related(mut self, related_item_id: impl Into<String>) -> Self {
        self.related_item_id = Some(related_item_id.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ViolationSummary {
    pub errors: usize,
    pub warnings: usize,
    pub affected_items: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub violations: Vec<Violation>,
    pub by_item: BTreeMap<String, Vec<Violation>>,
    pub summary: ViolationSummary,
}

impl ConflictReport {
    pub fn for_item(&self, item_id: &str) -> &[Violation] {
        self.by_item
            .get(item_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }
}
