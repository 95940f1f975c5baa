use serde::{Deserialize, Serialize};

use crate::models::redistribution::RedistributionMove;
use crate::models::suggestion::Suggestion;
use crate::models::violation::ConflictReport;
use crate::models::workload::WorkloadReport;

/// Combined output of one advisory run over a single snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryReport {
    pub item_count: usize,
    pub conflicts: ConflictReport,
    pub workload: WorkloadReport,
    pub suggestions: Vec<Suggestion>,
    pub moves: Vec<RedistributionMove>,
}
