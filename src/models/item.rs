use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};

use crate::services::schedule_utils;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemStatus {
    #[default]
    #[serde(alias = "pending")]
    Pending,
    #[serde(alias = "done")]
    Done,
    #[serde(alias = "cancelled")]
    Cancelled,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "PENDING",
            ItemStatus::Done => "DONE",
            ItemStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ItemStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(ItemStatus::Pending),
            "DONE" => Ok(ItemStatus::Done),
            "CANCELLED" => Ok(ItemStatus::Cancelled),
            other => Err(format!("unsupported item status: {other}")),
        }
    }
}

/// Declaration order is the redistribution order: LOW items move first.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemPriority {
    #[serde(alias = "low")]
    Low,
    #[default]
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "high")]
    High,
}

impl ItemPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemPriority::Low => "LOW",
            ItemPriority::Medium => "MEDIUM",
            ItemPriority::High => "HIGH",
        }
    }
}

impl fmt::Display for ItemPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ItemPriority {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase().as_str() {
            "LOW" => Ok(ItemPriority::Low),
            "MEDIUM" => Ok(ItemPriority::Medium),
            "HIGH" => Ok(ItemPriority::High),
            other => Err(format!("unsupported item priority: {other}")),
        }
    }
}

/// Grouping key for the owner of an item. Items without an assignee all land
/// in the `Unassigned` bucket, which sorts before every named assignee.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssigneeKey {
    Unassigned,
    Assigned(String),
}

impl AssigneeKey {
    pub fn from_optional(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(id) if !id.is_empty() => AssigneeKey::Assigned(id.to_string()),
            _ => AssigneeKey::Unassigned,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            AssigneeKey::Assigned(id) => Some(id.as_str()),
            AssigneeKey::Unassigned => None,
        }
    }

    pub fn is_unassigned(&self) -> bool {
        matches!(self, AssigneeKey::Unassigned)
    }
}

impl fmt::Display for AssigneeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssigneeKey::Assigned(id) => f.write_str(id),
            AssigneeKey::Unassigned => f.write_str("unassigned"),
        }
    }
}

impl Serialize for AssigneeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.id().serialize(serializer)
    }
}

/// A resolved `[start, end]` pair. `end` never precedes `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeInterval {
    /// Builds an interval, clamping a missing or inverted end to zero duration.
    pub fn clamped(start: DateTime<FixedOffset>, end: Option<DateTime<FixedOffset>>) -> Self {
        let end = match end {
            Some(end) if end > start => end,
            _ => start,
        };
        Self { start, end }
    }

    pub fn duration_minutes(&self) -> i64 {
        schedule_utils::duration_minutes(self.start, self.end)
    }

    pub fn day(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        schedule_utils::overlaps(self.start, self.end, other.start, other.end)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default, alias = "assignedTo")]
    pub assignee: Option<String>,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub priority: ItemPriority,
    #[serde(default, alias = "lead", alias = "client")]
    pub client_label: Option<String>,
}

impl ScheduledItem {
    pub fn assignee_key(&self) -> AssigneeKey {
        AssigneeKey::from_optional(self.assignee.as_deref())
    }

    pub fn start_at(&self) -> Option<DateTime<FixedOffset>> {
        self.start
            .as_deref()
            .and_then(schedule_utils::try_parse_datetime)
    }

    pub fn end_at(&self) -> Option<DateTime<FixedOffset>> {
        self.end
            .as_deref()
            .and_then(schedule_utils::try_parse_datetime)
    }

    /// `None` when the start is missing or unparsable.
    pub fn interval(&self) -> Option<TimeInterval> {
        self.start_at()
            .map(|start| TimeInterval::clamped(start, self.end_at()))
    }

    /// Cancelled items no longer occupy the calendar.
    pub fn is_active(&self) -> bool {
        self.status != ItemStatus::Cancelled
    }

    /// Only pending work is ever proposed for a move.
    pub fn is_movable(&self) -> bool {
        self.status == ItemStatus::Pending
    }

    pub fn client_label(&self) -> Option<&str> {
        self.client_label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.id
        } else {
            &self.title
        }
    }
}

/// Partial update a caller submits to the task store once a human accepts a
/// recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl ItemUpdate {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.assigned_to.is_none()
    }
}
