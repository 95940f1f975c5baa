use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OverloadedDay {
    pub date: NaiveDate,
    pub total: usize,
    pub high_priority_count: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OverloadedUser {
    pub assignee_id: String,
    pub total: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadReport {
    pub overloaded_days: Vec<OverloadedDay>,
    pub overloaded_users: Vec<OverloadedUser>,
}

impl WorkloadReport {
    pub fn is_day_overloaded(&self, date: NaiveDate) -> bool {
        self.overloaded_days.iter().any(|day| day.date == date)
    }

    pub fn is_empty(&self) -> bool {
        self.overloaded_days.is_empty() && self.overloaded_users.is_empty()
    }
}
