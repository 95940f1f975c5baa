use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RedistributionMove {
    pub item_id: String,
    pub from_day: NaiveDate,
    pub to_day: NaiveDate,
    pub reason: String,
}

impl RedistributionMove {
    /// Signed calendar distance of the move.
    pub fn day_delta(&self) -> i64 {
        self.to_day
            .signed_duration_since(self.from_day)
            .num_days()
    }
}
